use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default OCR line cleanup
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Unicode normalization (NFKC) folds full-width forms into ASCII
        let text: String = text.nfkc().collect();

        // Recognizers may split a line with newlines or runs of spaces
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
