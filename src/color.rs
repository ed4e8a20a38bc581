/// A RGB color value.
///
/// Channels are 16 bits wide. Use `from_rgb8` for eight-bit samples, e.g. from an image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub red: u16,

    /// Green channel.
    pub green: u16,

    /// Blue channel.
    pub blue: u16,
}

impl Color {
    /// Creates a new color.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Color;
    /// let color = Color::new(1, 2, 3);
    /// assert_eq!(1, color.red);
    /// assert_eq!(2, color.green);
    /// assert_eq!(3, color.blue);
    /// ```
    pub fn new(red: u16, green: u16, blue: u16) -> Color {
        Color { red, green, blue }
    }

    /// Creates a color from eight-bit channels, stretching them over the full 16-bit range.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Color;
    /// assert_eq!(Color::new(0, 32896, 65535), Color::from_rgb8(0, 128, 255));
    /// ```
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Color {
        let stretch = |n: u8| u16::from(n) * 257;
        Color::new(stretch(red), stretch(green), stretch(blue))
    }
}

impl From<(u16, u16, u16)> for Color {
    fn from((red, green, blue): (u16, u16, u16)) -> Color {
        Color { red, green, blue }
    }
}
