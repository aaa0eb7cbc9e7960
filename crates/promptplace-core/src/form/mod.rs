//! Request-form handling: locate, inline, extract, reinsert.
//!
//! A page carries a small form that lets visitors file new change requests.
//! Before the page is handed to a model the form is lifted out with its styles
//! inlined ([`extract_form`]); after the model rewrites the page the form is
//! put back ([`reinsert_form`]).

pub mod extract;
pub mod inline;
pub mod locate;
pub mod reinsert;

pub use extract::{Extraction, FormOrigin, extract_form, fallback_form_block};
pub use inline::inline_styles;
pub use locate::{ContainerMatch, FormLocation, LocateStrategy, locate_form};
pub use reinsert::{Placement, Reinsertion, reinsert_form, reinsert_form_with_placement};
