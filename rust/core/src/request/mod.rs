//! Request model and the decoders that build it.

pub mod parser;
pub mod types;

pub use parser::{
    parse_body, parse_form_body, parse_headers, parse_json_body, parse_query_string, ParseError,
};
pub use types::{HttpRequest, RequestBody};
