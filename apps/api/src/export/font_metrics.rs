//! Static Helvetica metrics and greedy word-wrap for the flat-text PDF export.
//!
//! Widths are the standard Adobe AFM advance widths in 1/1000 em, covering ASCII
//! 0x20..=0x7E (95 printable characters). Index = (char as usize) - 32.
//! Anything outside that range falls back to `AVERAGE_WIDTH`.

/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // sp../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

const AVERAGE_WIDTH: u16 = 556;

/// Advance width of one character in 1/1000 em.
pub fn char_width(c: char) -> u16 {
    let code = c as usize;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[code - 32]
    } else {
        AVERAGE_WIDTH
    }
}

/// Rendered width of a string in points at `font_size_pt`.
pub fn measure_str(s: &str, font_size_pt: f32) -> f32 {
    let units: u32 = s.chars().map(|c| char_width(c) as u32).sum();
    units as f32 * font_size_pt / 1000.0
}

/// Splits `text` into printed lines no wider than `max_width_pt`.
///
/// Explicit newlines are kept (an empty source line yields an empty printed line).
/// Words wider than the line are broken by character.
pub fn wrap_lines(text: &str, font_size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let space = measure_str(" ", font_size_pt);
    let mut lines = Vec::new();

    for source_line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in source_line.split_whitespace() {
            let word_width = measure_str(word, font_size_pt);

            if word_width > max_width_pt {
                // Flush what we have, then hard-break the long word.
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current_width = 0.0;
                for c in word.chars() {
                    let w = measure_str(c.encode_utf8(&mut [0u8; 4]), font_size_pt);
                    if current_width + w > max_width_pt && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0.0;
                    }
                    current.push(c);
                    current_width += w;
                }
                continue;
            }

            let needed = if current.is_empty() {
                word_width
            } else {
                current_width + space + word_width
            };

            if needed > max_width_pt {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_width;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width = needed;
            }
        }

        lines.push(current);
    }

    lines
}
