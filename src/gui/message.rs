use iced::Point;

#[derive(Debug, Clone)]
pub enum Message {
    /// Cursor position relative to the displayed image
    CursorMoved(Point),
    /// Left button pressed over the image
    Clicked,
    /// "Continue" button or any key press
    Continue,
}
