pub mod cli;
pub mod emitter;
pub mod layout;
pub mod markup;
pub mod parser;

pub fn get_command_tags() -> Vec<String> {
    parser::table_style::COMMAND_TAGS
        .iter()
        .map(|tag| tag.to_string())
        .collect()
}

pub fn get_output_types() -> Vec<String> {
    vec!["diagram".to_string(), "styles".to_string()]
}
