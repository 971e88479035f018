pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::{dir_from_env, get_home_dir};
pub use paths::{
    decode_and_validate_path, decode_path, file_modified_time,
    format_path_with_tilde, project_name, read_transcript, validate_decoded_path,
    validate_file_size, validate_path_not_symlink,
};
pub use terminal::{sanitize_for_terminal, single_line};
