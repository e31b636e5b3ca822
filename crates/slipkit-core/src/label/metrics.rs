//! Standard Helvetica metrics and WinAnsi encoding for label text.

/// The three faces of the standard Helvetica family used on labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl LabelFont {
    pub const ALL: [LabelFont; 3] = [
        LabelFont::Helvetica,
        LabelFont::HelveticaBold,
        LabelFont::HelveticaOblique,
    ];

    /// PostScript base font name.
    pub fn base_font(&self) -> &'static str {
        match self {
            LabelFont::Helvetica => "Helvetica",
            LabelFont::HelveticaBold => "Helvetica-Bold",
            LabelFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Page resource name.
    pub fn resource(&self) -> &'static str {
        match self {
            LabelFont::Helvetica => "F1",
            LabelFont::HelveticaBold => "F2",
            LabelFont::HelveticaOblique => "F3",
        }
    }

    /// Width of `text` in points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.char_width(c)).sum::<f32>() * size / 1000.0
    }

    /// Glyph width in 1/1000 em.
    pub fn char_width(&self, c: char) -> f32 {
        let bold = *self == LabelFont::HelveticaBold;
        let code = c as u32;
        if (0x20..=0x7E).contains(&code) {
            let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
            return table[(code - 0x20) as usize] as f32;
        }
        match c {
            '•' => 350.0,
            '…' | '—' | '™' => 1000.0,
            '–' | '€' => 556.0,
            '×' => 584.0,
            '·' => 278.0,
            '‘' | '’' => if bold { 278.0 } else { 222.0 },
            '“' | '”' => if bold { 500.0 } else { 333.0 },
            '\u{00A0}' => 278.0,
            _ => match base_letter(c) {
                Some(base) => self.char_width(base),
                None => 556.0,
            },
        }
    }
}

/// Helvetica widths for 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Helvetica-Bold widths for 0x20..=0x7E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Accented Latin-1 letters share their base letter's advance width.
fn base_letter(c: char) -> Option<char> {
    let base = match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

/// WinAnsi code points 0x80..=0x9F.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

/// Encode text for a WinAnsiEncoding font. Fails with the first character
/// that has no WinAnsi code.
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>, char> {
    text.chars().map(encode_char).collect()
}

fn encode_char(c: char) -> Result<u8, char> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Ok(code as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, byte)| *byte)
            .ok_or(c),
    }
}

/// Decode WinAnsi bytes back to text.
pub fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => WIN_ANSI_HIGH
                .iter()
                .find(|(_, byte)| *byte == b)
                .map(|(ch, _)| *ch)
                .unwrap_or('\u{FFFD}'),
            _ => b as char,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(LabelFont::Helvetica.char_width(' '), 278.0);
        assert_eq!(LabelFont::Helvetica.char_width('W'), 944.0);
        assert_eq!(LabelFont::Helvetica.char_width('~'), 584.0);
        assert_eq!(LabelFont::HelveticaBold.char_width('m'), 889.0);
        assert_eq!(LabelFont::HelveticaOblique.char_width('i'), 222.0);
        assert_eq!(LabelFont::Helvetica.char_width('é'), 556.0);
        assert_eq!(LabelFont::Helvetica.char_width('•'), 350.0);
    }

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222
        let width = LabelFont::Helvetica.text_width("Hi", 10.0);
        assert!((width - 9.44).abs() < 1e-4);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("A × 2").unwrap(), vec![b'A', b' ', 0xD7, b' ', b'2']);
        assert_eq!(encode_win_ansi("• …").unwrap(), vec![0x95, b' ', 0x85]);
        assert_eq!(encode_win_ansi("Marrón").unwrap()[4], 0xF3);
        assert_eq!(encode_win_ansi("hi 🎁"), Err('🎁'));
        assert_eq!(decode_win_ansi(&encode_win_ansi("Ñandú • – …").unwrap()), "Ñandú • – …");
    }
}
