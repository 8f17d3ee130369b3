use rand::distributions::Alphanumeric;
use rand::prelude::*;

/// A random name for an object file that is still being written.
pub fn tmp_file_name() -> String {
    let suffix = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>();

    format!("tmp_obj_{suffix}")
}
