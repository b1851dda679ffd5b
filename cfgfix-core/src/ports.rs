//! Port traits for output produced while a pipeline runs.

/// Sink for status text that must appear before the run finishes, such as
/// the diff preview shown ahead of the save question.
pub trait Console {
    fn show(&mut self, text: &str);
}
