use std::{borrow::Cow, path::Path};

use chrono::{DateTime, Local};
use humansize::{ToF64, Unsigned, DECIMAL};

pub fn format_path(path: &Path) -> String {
    let path_str = path.to_string_lossy();
    let escaped_path = snailquote::escape(&path_str);
    if let Cow::Owned(owned_path) = escaped_path {
        owned_path
    } else {
        path_str.to_string()
    }
}

pub fn format_size<T: ToF64 + Unsigned>(input: T) -> String {
    humansize::format_size(input, DECIMAL)
}

/// Size in binary megabytes with two decimals, e.g. `2.00 MB`.
#[allow(clippy::cast_precision_loss)]
pub fn format_megabytes(bytes: u64) -> String {
    let megabytes = bytes as f64 / 1024.0 / 1024.0;
    format!("{megabytes:.2} MB")
}

pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn megabytes() {
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(2_097_152), "2.00 MB");
        assert_eq!(format_megabytes(1_572_864), "1.50 MB");
    }
}
