//! # Display
//! Screen layout of the ventilator on a 20x6 character grid.
//!
//! The screen is a set of fixed fields. Every write replaces a whole field: it is blanked
//! first and the new text is clipped to the field width, so a shorter value never leaves
//! stale characters behind.
//!
//! ```text
//!  0         1
//!  01234567890123456789
//! 0Set:       P(cmH2O):   header, or the pending confirmation
//! 1 V=NN% max   peak=NN
//! 2 RR=NN/min   plat=NN
//! 3 I:E=1:N.N   PEEP=NN
//! 4 AC=N.N      Zz M:SS   snooze countdown while snoozed
//! 5                       footer, the active alarm
//! ```

use core::fmt::Write;

use heapless::String;

use crate::config::{DISPLAY_COLS, DISPLAY_ROWS, FOOTER_WIDTH, HEADER_TITLE};

/// Character display that can overwrite a fixed-width field
pub trait TextDisplay {
    /// Blank `width` characters at (`row`, `col`), then write `text` there, clipped to `width`
    fn write(&mut self, row: usize, col: usize, text: &str, width: usize);
}

/// In-memory character grid, the frame buffer of the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGrid<const COLS: usize, const ROWS: usize> {
    /// Printable ASCII only
    cells: [[u8; COLS]; ROWS],
}

/// The grid matching the ventilator screen
pub type Screen = TextGrid<DISPLAY_COLS, DISPLAY_ROWS>;

impl<const COLS: usize, const ROWS: usize> TextGrid<COLS, ROWS> {
    /// A blank grid
    pub const fn new() -> Self {
        Self {
            cells: [[b' '; COLS]; ROWS],
        }
    }

    /// Blank every cell
    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(b' ');
        }
    }

    /// The text of `row`, `None` outside the grid
    pub fn row(&self, row: usize) -> Option<&str> {
        self.cells
            .get(row)
            .and_then(|cells| core::str::from_utf8(cells).ok())
    }

    /// Iterate over all rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .filter_map(|cells| core::str::from_utf8(cells).ok())
    }
}

impl<const COLS: usize, const ROWS: usize> Default for TextGrid<COLS, ROWS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const COLS: usize, const ROWS: usize> TextDisplay for TextGrid<COLS, ROWS> {
    fn write(&mut self, row: usize, col: usize, text: &str, width: usize) {
        let Some(cells) = self.cells.get_mut(row) else {
            return;
        };
        let end = col.saturating_add(width).min(COLS);
        let Some(field) = cells.get_mut(col..end) else {
            return;
        };
        field.fill(b' ');
        for (cell, ch) in field.iter_mut().zip(text.chars()) {
            *cell = u8::try_from(ch)
                .ok()
                .filter(|byte| *byte == b' ' || byte.is_ascii_graphic())
                .unwrap_or(b'?');
        }
    }
}

/// Every field of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayKey {
    /// Title, or the pending confirmation message
    Header,
    /// Set tidal volume
    Volume,
    /// Set breaths per minute
    Bpm,
    /// Set I:E ratio
    IeRatio,
    /// Assist-control trigger
    AcTrigger,
    /// Measured peak pressure
    PeakPressure,
    /// Measured plateau pressure
    PlateauPressure,
    /// Measured PEEP
    Peep,
    /// Snooze countdown
    Snooze,
    /// Active alarm text
    AlarmFooter,
}

/// Position and width of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Row on the grid
    pub row: usize,
    /// First column
    pub col: usize,
    /// Width in characters
    pub width: usize,
}

impl DisplayKey {
    /// Where this field sits on the screen
    pub const fn field(self) -> Field {
        let (row, col, width) = match self {
            Self::Header => (0, 0, FOOTER_WIDTH),
            Self::Volume => (1, 0, 11),
            Self::Bpm => (2, 0, 11),
            Self::IeRatio => (3, 0, 11),
            Self::AcTrigger => (4, 0, 11),
            Self::PeakPressure => (1, 11, 9),
            Self::PlateauPressure => (2, 11, 9),
            Self::Peep => (3, 11, 9),
            Self::Snooze => (4, 11, 9),
            Self::AlarmFooter => (5, 0, FOOTER_WIDTH),
        };
        Field { row, col, width }
    }
}

/// Text of one field, never wider than the screen
pub type FieldText = String<DISPLAY_COLS>;

/// Format into a field; overflow clips the text
fn field_text(args: core::fmt::Arguments<'_>) -> FieldText {
    let mut text = FieldText::new();
    let _ = text.write_fmt(args);
    text
}

/// Two-digit readout
fn two_digits(value: i32) -> i32 {
    value.clamp(-9, 99)
}

/// One-decimal readout below 10
fn one_decimal(value: f32) -> f32 {
    value.clamp(0.0, 9.9)
}

/// ` V=NN% max `
pub fn volume_text(percent: i32) -> FieldText {
    field_text(format_args!(" V={:2}% max ", two_digits(percent)))
}

/// ` RR=NN/min `
pub fn bpm_text(bpm: i32) -> FieldText {
    field_text(format_args!(" RR={:2}/min ", two_digits(bpm)))
}

/// ` I:E=1:N.N `
pub fn ie_ratio_text(ratio: f32) -> FieldText {
    field_text(format_args!(" I:E=1:{:3.1} ", one_decimal(ratio)))
}

/// `  peak=NN`
pub fn peak_text(pressure: i32) -> FieldText {
    field_text(format_args!("  peak={:2}", two_digits(pressure)))
}

/// `  plat=NN`
pub fn plateau_text(pressure: i32) -> FieldText {
    field_text(format_args!("  plat={:2}", two_digits(pressure)))
}

/// `  PEEP=NN`
pub fn peep_text(pressure: i32) -> FieldText {
    field_text(format_args!("  PEEP={:2}", two_digits(pressure)))
}

/// ` AC=N.N`, or ` AC=off` when assist-control triggering is disabled
pub fn ac_trigger_text(threshold: Option<f32>) -> FieldText {
    match threshold {
        Some(threshold) => field_text(format_args!(" AC={:3.1}", one_decimal(threshold))),
        None => field_text(format_args!(" AC=off")),
    }
}

/// `  Zz M:SS` rounded up to the second, blank when `remaining_ms` is 0
pub fn snooze_text(remaining_ms: u32) -> FieldText {
    if remaining_ms == 0 {
        return FieldText::new();
    }
    let seconds = remaining_ms.div_ceil(1000);
    let minutes = (seconds / 60).min(9);
    field_text(format_args!("  Zz {}:{:02}", minutes, seconds % 60))
}

/// The ventilator screen, drawn on any [`TextDisplay`]
#[derive(Debug)]
pub struct Display<D> {
    /// Where the fields are drawn
    inner: D,
}

impl<D: TextDisplay> Display<D> {
    /// Wrap a character display
    pub const fn new(inner: D) -> Self {
        Self { inner }
    }

    /// Draw the title header and a blank footer
    pub fn begin(&mut self) {
        self.write_header(HEADER_TITLE);
        self.write_footer("");
    }

    /// Overwrite the field `key` with `text`
    pub fn write(&mut self, key: DisplayKey, text: &str) {
        let Field { row, col, width } = key.field();
        self.inner.write(row, col, text, width);
    }

    /// Header region
    pub fn write_header(&mut self, text: &str) {
        self.write(DisplayKey::Header, text);
    }

    /// Footer region
    pub fn write_footer(&mut self, text: &str) {
        self.write(DisplayKey::AlarmFooter, text);
    }

    /// Set tidal volume, in percent of the maximum
    pub fn write_volume(&mut self, percent: i32) {
        self.write(DisplayKey::Volume, &volume_text(percent));
    }

    /// Set breaths per minute
    pub fn write_bpm(&mut self, bpm: i32) {
        self.write(DisplayKey::Bpm, &bpm_text(bpm));
    }

    /// Set I:E ratio, as the `N` of 1:N
    pub fn write_ie_ratio(&mut self, ratio: f32) {
        self.write(DisplayKey::IeRatio, &ie_ratio_text(ratio));
    }

    /// Measured peak pressure in cmH2O
    pub fn write_peak(&mut self, pressure: i32) {
        self.write(DisplayKey::PeakPressure, &peak_text(pressure));
    }

    /// Measured plateau pressure in cmH2O
    pub fn write_plateau(&mut self, pressure: i32) {
        self.write(DisplayKey::PlateauPressure, &plateau_text(pressure));
    }

    /// Measured PEEP in cmH2O
    pub fn write_peep(&mut self, pressure: i32) {
        self.write(DisplayKey::Peep, &peep_text(pressure));
    }

    /// Assist-control trigger threshold, `None` when off
    pub fn write_ac_trigger(&mut self, threshold: Option<f32>) {
        self.write(DisplayKey::AcTrigger, &ac_trigger_text(threshold));
    }

    /// Snooze countdown, blank when not snoozed
    pub fn write_snooze(&mut self, remaining_ms: u32) {
        self.write(DisplayKey::Snooze, &snooze_text(remaining_ms));
    }

    /// The wrapped display
    pub const fn inner(&self) -> &D {
        &self.inner
    }

    /// The wrapped display, mutably
    pub const fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_clears_the_whole_field() {
        let mut grid = TextGrid::<10, 2>::new();
        grid.write(0, 2, "LONGER", 6);
        grid.write(0, 2, "AB", 6);
        assert_eq!(grid.row(0), Some("  AB      "));
    }

    #[test]
    fn write_clips_to_width_and_grid() {
        let mut grid = TextGrid::<6, 1>::new();
        grid.write(0, 0, "ABCDEF", 3);
        assert_eq!(grid.row(0), Some("ABC   "));
        grid.write(0, 4, "XYZ", 5);
        assert_eq!(grid.row(0), Some("ABC XY"));
        grid.write(1, 0, "nowhere", 6);
        grid.write(0, 9, "nowhere", 6);
        assert_eq!(grid.row(1), None);
        assert_eq!(grid.row(0), Some("ABC XY"));
    }

    #[test]
    fn non_ascii_becomes_question_mark() {
        let mut grid = TextGrid::<6, 1>::new();
        grid.write(0, 0, "a\u{b0}b\nc", 6);
        assert_eq!(grid.row(0), Some("a?b?c "));
    }

    #[test]
    fn layout_matches_the_screen() {
        let mut display = Display::new(Screen::new());
        display.begin();
        display.write_volume(80);
        display.write_bpm(16);
        display.write_ie_ratio(2.0);
        display.write_peak(35);
        display.write_plateau(28);
        display.write_peep(5);
        display.write_ac_trigger(None);
        display.write_snooze(0);
        display.write_footer("HIGH PRESSURE");

        let rows: heapless::Vec<&str, DISPLAY_ROWS> = display.inner().rows().collect();
        assert_eq!(
            rows.as_slice(),
            &[
                "Set:       P(cmH2O):",
                " V=80% max   peak=35",
                " RR=16/min   plat=28",
                " I:E=1:2.0   PEEP= 5",
                " AC=off             ",
                "HIGH PRESSURE       ",
            ]
        );
    }

    #[test]
    fn values_stay_within_their_fields() {
        assert_eq!(volume_text(150).as_str(), " V=99% max ");
        assert_eq!(bpm_text(-40).as_str(), " RR=-9/min ");
        assert_eq!(ie_ratio_text(12.5).as_str(), " I:E=1:9.9 ");
        assert_eq!(ac_trigger_text(Some(1.5)).as_str(), " AC=1.5");
        assert_eq!(peep_text(7).as_str(), "  PEEP= 7");
    }

    #[test]
    fn snooze_countdown_rounds_up() {
        assert_eq!(snooze_text(0).as_str(), "");
        assert_eq!(snooze_text(120_000).as_str(), "  Zz 2:00");
        assert_eq!(snooze_text(119_001).as_str(), "  Zz 2:00");
        assert_eq!(snooze_text(119_000).as_str(), "  Zz 1:59");
        assert_eq!(snooze_text(1).as_str(), "  Zz 0:01");
    }
}
