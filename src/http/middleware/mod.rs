pub mod json_body;

pub use json_body::{parse_json_body, BodyParsing, JsonBody};
