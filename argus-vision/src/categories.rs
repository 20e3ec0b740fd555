//! Category vocabulary for the detection model

use argus_core::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// COCO category names as indexed by the pretrained Faster R-CNN weights
/// (91 entries; index 0 is the background class and gaps in the original
/// annotation ids appear as "N/A").
pub const COCO_CATEGORIES: &[&str] = &[
    "__background__",
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "N/A",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "N/A",
    "backpack",
    "umbrella",
    "N/A",
    "N/A",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "N/A",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "couch",
    "potted plant",
    "bed",
    "N/A",
    "dining table",
    "N/A",
    "N/A",
    "toilet",
    "N/A",
    "tv",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "N/A",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// The built-in category table as owned strings.
pub fn builtin_categories() -> Vec<String> {
    COCO_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

/// Load a category table from a newline-delimited labels file. Line N names
/// the category with model label index N, so blank lines are rejected.
pub fn load_categories(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut categories = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let name = line?.trim().to_string();
        if name.is_empty() {
            return Err(Error::Configuration(format!(
                "empty category name at line {} in {}",
                line_no + 1,
                path.display()
            )));
        }
        categories.push(name);
    }

    if categories.is_empty() {
        return Err(Error::Configuration(format!(
            "labels file {} contains no categories",
            path.display()
        )));
    }

    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_table_shape() {
        assert_eq!(COCO_CATEGORIES.len(), 91);
        assert_eq!(COCO_CATEGORIES[0], "__background__");
        assert_eq!(COCO_CATEGORIES[1], "person");
        assert_eq!(COCO_CATEGORIES[18], "dog");
        assert_eq!(COCO_CATEGORIES[90], "toothbrush");
    }

    #[test]
    fn test_builtin_categories_owned() {
        let categories = builtin_categories();
        assert_eq!(categories.len(), COCO_CATEGORIES.len());
        assert_eq!(categories[17], "cat");
    }

    #[test]
    fn test_load_categories_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "background").unwrap();
        writeln!(file, "widget").unwrap();
        writeln!(file, "gadget").unwrap();

        let categories = load_categories(file.path()).unwrap();
        assert_eq!(categories, vec!["background", "widget", "gadget"]);
    }

    #[test]
    fn test_load_categories_rejects_blank_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "background").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "gadget").unwrap();

        assert!(load_categories(file.path()).is_err());
    }

    #[test]
    fn test_load_categories_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_such_labels.txt");
        assert!(load_categories(&missing).is_err());
    }
}
