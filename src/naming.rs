//! Output filenames.
//!
//! Every worker writes to a temporary name that embeds its worker id, so two
//! workers never share an in-flight path. The final name is only known once
//! the crop outcome is:
//!
//! - `photo.jpg` cropped → `photo_cropped.jpg`
//! - `photo.jpg` unchanged → `photo.jpg`
//! - `.temp_3_photo.jpg` while worker 3 is still writing

/// Prefix shared by every in-flight output file.
pub const TEMP_PREFIX: &str = ".temp_";

/// Temporary name for `filename` while `worker` is producing it.
pub fn temp_file_name(worker: usize, filename: &str) -> String {
    format!("{TEMP_PREFIX}{worker}_{filename}")
}

/// Final output name for `filename`.
///
/// The extension is kept as-is; only the stem gets the `_cropped` suffix.
pub fn output_file_name(filename: &str, was_cropped: bool) -> String {
    if !was_cropped {
        return filename.to_string();
    }
    match filename.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_cropped{}", &filename[..dot], &filename[dot..]),
        _ => format!("{filename}_cropped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_name_embeds_worker_and_file() {
        assert_eq!(temp_file_name(0, "a.jpg"), ".temp_0_a.jpg");
        assert_eq!(temp_file_name(12, "IMG 1.png"), ".temp_12_IMG 1.png");
    }

    #[test]
    fn temp_names_differ_per_worker() {
        assert_ne!(temp_file_name(1, "a.jpg"), temp_file_name(2, "a.jpg"));
    }

    #[test]
    fn unchanged_keeps_original_name() {
        assert_eq!(output_file_name("photo.jpg", false), "photo.jpg");
    }

    #[test]
    fn cropped_gets_suffix_before_extension() {
        assert_eq!(output_file_name("photo.jpg", true), "photo_cropped.jpg");
        assert_eq!(output_file_name("scan.PNG", true), "scan_cropped.PNG");
    }

    #[test]
    fn only_last_extension_is_split() {
        assert_eq!(
            output_file_name("archive.v2.jpeg", true),
            "archive.v2_cropped.jpeg"
        );
    }

    #[test]
    fn names_without_extension() {
        assert_eq!(output_file_name("raw", true), "raw_cropped");
        assert_eq!(output_file_name(".hidden", true), ".hidden_cropped");
    }
}
