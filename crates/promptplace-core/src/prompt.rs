//! Instruction template sent to the language model.

/// Build the rewrite prompt for `page` (with its form already removed).
pub fn build_prompt(page: &str, instructions: &str) -> String {
    format!(
        r"
Please modify the following HTML/CSS/JS webpage according to these instructions:

INSTRUCTIONS: {instructions}

IMPORTANT RULES:
1. Return the COMPLETE updated HTML file, not just a snippet or the changes.
2. Respond with only the HTML code, no explanations or markdown formatting.
3. Feel free to enhance the CSS and add JavaScript as needed.
4. Maintain the overall structure with html, head, and body tags.

CURRENT HTML:
```html
{page}
```

Provide the complete updated HTML file:
"
    )
}
