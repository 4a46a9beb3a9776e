//! Text and bitmap layers

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use super::{
    fonts::{system_font, FontKey},
    resources::Bitmap,
    text::TextBuffer,
    Error,
};

/// Positioned visual element of a window
pub trait Layer {
    /// Area the layer draws into
    fn frame(&self) -> Rectangle;

    fn is_hidden(&self) -> bool;

    /// Show or hide the layer. Return whether the visibility changed.
    fn set_hidden(&mut self, hidden: bool) -> bool;

    /// Draw the layer content, clipped to its frame.
    fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;

    /// Draw the layer unless it is hidden.
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if self.is_hidden() {
            return Ok(());
        }
        self.render(&mut target.clipped(&self.frame()))
    }
}

/// Single line of text
pub struct TextLayer<const N: usize> {
    frame: Rectangle,
    text: TextBuffer<N>,
    font: &'static MonoFont<'static>,
    text_color: Rgb565,
    /// `None` leaves the pixels behind the text untouched
    background_color: Option<Rgb565>,
    alignment: Alignment,
    hidden: bool,
}

impl<const N: usize> TextLayer<N> {
    /// Create an empty layer with black text on white, left aligned.
    pub fn new(frame: Rectangle) -> Self {
        Self {
            frame,
            text: TextBuffer::new(),
            font: system_font(FontKey::Gothic18Bold),
            text_color: Rgb565::BLACK,
            background_color: Some(Rgb565::WHITE),
            alignment: Alignment::Left,
            hidden: false,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Replace the text. Return whether it changed.
    pub fn set_text(&mut self, text: &str) -> Result<bool, Error> {
        self.text.set(text)
    }

    /// Buffer holding the text, for formatting in place
    pub fn buffer_mut(&mut self) -> &mut TextBuffer<N> {
        &mut self.text
    }

    pub fn set_font(&mut self, font: &'static MonoFont<'static>) {
        self.font = font;
    }

    pub fn set_text_color(&mut self, color: Rgb565) {
        self.text_color = color;
    }

    pub fn set_background_color(&mut self, color: Option<Rgb565>) {
        self.background_color = color;
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    fn anchor(&self) -> Point {
        let Point { x, y } = self.frame.top_left;
        let width = self.frame.size.width as i32;
        match self.alignment {
            Alignment::Left => Point::new(x, y),
            Alignment::Center => Point::new(x + width / 2, y),
            Alignment::Right => Point::new(x + width - 1, y),
        }
    }
}

impl<const N: usize> Layer for TextLayer<N> {
    fn frame(&self) -> Rectangle {
        self.frame
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) -> bool {
        let changed = self.hidden != hidden;
        self.hidden = hidden;
        changed
    }

    fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if let Some(color) = self.background_color {
            target.fill_solid(&self.frame, color)?;
        }
        if self.text.is_empty() {
            return Ok(());
        }

        let character_style = MonoTextStyle::new(self.font, self.text_color);
        let text_style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(Baseline::Top)
            .build();
        Text::with_text_style(self.text(), self.anchor(), character_style, text_style)
            .draw(target)?;

        Ok(())
    }
}

/// How set and unset bitmap pixels are combined with what is already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositingMode {
    /// Set pixels are drawn in the foreground colour, unset pixels in black
    Assign,
    /// Only set pixels are drawn
    Or,
}

/// Monochrome image centred in its frame
pub struct BitmapLayer {
    frame: Rectangle,
    bitmap: Option<Bitmap>,
    color: Rgb565,
    compositing: CompositingMode,
    hidden: bool,
}

impl BitmapLayer {
    pub fn new(frame: Rectangle) -> Self {
        Self {
            frame,
            bitmap: None,
            color: Rgb565::WHITE,
            compositing: CompositingMode::Assign,
            hidden: false,
        }
    }

    pub fn set_bitmap(&mut self, bitmap: Bitmap) {
        self.bitmap = Some(bitmap);
    }

    pub fn set_compositing_mode(&mut self, mode: CompositingMode) {
        self.compositing = mode;
    }

    /// Area covered by the bitmap
    fn image_area(&self, bitmap: &Bitmap) -> Rectangle {
        let size = bitmap.size();
        let offset = Point::new(
            (self.frame.size.width as i32 - size.width as i32) / 2,
            (self.frame.size.height as i32 - size.height as i32) / 2,
        );
        Rectangle::new(self.frame.top_left + offset, size)
    }
}

impl Layer for BitmapLayer {
    fn frame(&self) -> Rectangle {
        self.frame
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) -> bool {
        let changed = self.hidden != hidden;
        self.hidden = hidden;
        changed
    }

    fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(bitmap) = self.bitmap else {
            return Ok(());
        };
        let area = self.image_area(&bitmap);
        let Size { width, height } = area.size;
        let pixels = (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)));

        match self.compositing {
            CompositingMode::Assign => {
                // One contiguous transfer instead of a window per pixel
                let colors = pixels.map(|(x, y)| {
                    if bitmap.is_set(x, y) {
                        self.color
                    } else {
                        Rgb565::BLACK
                    }
                });
                target.fill_contiguous(&area, colors)
            }
            CompositingMode::Or => {
                let origin = area.top_left;
                let set = pixels
                    .filter(|&(x, y)| bitmap.is_set(x, y))
                    .map(|(x, y)| Pixel(origin + Point::new(x as i32, y as i32), self.color));
                target.draw_iter(set)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    // 4x2 checkerboard: row 0 = X.X., row 1 = .X.X
    static CHECKER: [u8; 2] = [0b1010_0000, 0b0101_0000];

    fn checker_layer(mode: CompositingMode) -> BitmapLayer {
        let mut layer = BitmapLayer::new(Rectangle::new(Point::new(2, 2), Size::new(8, 4)));
        layer.set_bitmap(Bitmap::new(&CHECKER, 4));
        layer.set_compositing_mode(mode);
        layer
    }

    #[test]
    fn bitmap_is_centred_in_frame() {
        let layer = checker_layer(CompositingMode::Assign);
        let area = layer.image_area(&Bitmap::new(&CHECKER, 4));
        assert_eq!(area, Rectangle::new(Point::new(4, 3), Size::new(4, 2)));
    }

    #[test]
    fn assign_draws_set_and_unset_pixels() {
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        checker_layer(CompositingMode::Assign)
            .draw(&mut display)
            .unwrap();

        assert_eq!(display.get_pixel(Point::new(4, 3)), Some(Rgb565::WHITE));
        assert_eq!(display.get_pixel(Point::new(5, 3)), Some(Rgb565::BLACK));
        assert_eq!(display.get_pixel(Point::new(5, 4)), Some(Rgb565::WHITE));
        assert_eq!(display.get_pixel(Point::new(3, 3)), None);
    }

    #[test]
    fn or_draws_only_set_pixels() {
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        checker_layer(CompositingMode::Or).draw(&mut display).unwrap();

        assert_eq!(display.get_pixel(Point::new(4, 3)), Some(Rgb565::WHITE));
        assert_eq!(display.get_pixel(Point::new(5, 3)), None);
        assert_eq!(display.get_pixel(Point::new(7, 4)), Some(Rgb565::WHITE));
    }

    #[test]
    fn hidden_layers_draw_nothing() {
        let mut layer = checker_layer(CompositingMode::Assign);
        assert!(layer.set_hidden(true));
        assert!(!layer.set_hidden(true));

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        layer.draw(&mut display).unwrap();
        assert!(display.affected_area().is_zero_sized());
    }

    #[test]
    fn text_stays_inside_frame() {
        let frame = Rectangle::new(Point::new(0, 10), Size::new(60, 20));
        let mut layer = TextLayer::<8>::new(frame);
        layer.set_background_color(None);
        layer.set_text_color(Rgb565::WHITE);
        layer.set_alignment(Alignment::Right);
        assert_eq!(layer.set_text("42%"), Ok(true));

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        layer.draw(&mut display).unwrap();

        let drawn = display.affected_area();
        assert!(!drawn.is_zero_sized());
        assert!(frame.contains(drawn.top_left));
        assert!(frame.contains(drawn.bottom_right().unwrap()));
        // Right aligned: the text ends at the right edge of the frame
        assert!(drawn.bottom_right().unwrap().x > 50);
    }

    #[test]
    fn background_fills_whole_frame() {
        let frame = Rectangle::new(Point::new(1, 1), Size::new(30, 22));
        let mut layer = TextLayer::<8>::new(frame);
        layer.set_text("ab").unwrap();

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        layer.draw(&mut display).unwrap();

        assert_eq!(display.affected_area(), frame);
        assert_eq!(display.get_pixel(Point::new(30, 22)), Some(Rgb565::WHITE));
    }
}
