use ahash::AHashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use umya_spreadsheet::structs::{
    EnumTrait, HorizontalAlignmentValues, VerticalAlignmentRunValues, VerticalAlignmentValues,
};
use umya_spreadsheet::{Border, Color, Fill, Font, Protection, Style};

/// Opaque style identity. Two cells share a fingerprint iff every styling
/// attribute (font, border, fill, number format, protection, alignment) is
/// equal; nothing is compared partially. The digest is taken over the
/// canonical JSON form of the full descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleFingerprint([u8; 32]);

pub fn fingerprint_style(style: &Style) -> StyleFingerprint {
    let descriptor = descriptor_from_style(style);
    let bytes = serde_json::to_vec(&descriptor).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    StyleFingerprint(hasher.finalize().into())
}

/// Per-run mapping from style fingerprints to materialized output styles.
/// Append-only and bounded by the number of distinct styles across the
/// inputs, not by total cell count. Scoped to one engine run; never shared.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    map: AHashMap<StyleFingerprint, Style>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the style previously produced for `fingerprint`, or invokes
    /// `factory` once to materialize and store a new one.
    pub fn intern_or_create<F>(&mut self, fingerprint: StyleFingerprint, factory: F) -> &Style
    where
        F: FnOnce() -> Style,
    {
        self.map.entry(fingerprint).or_insert_with(factory)
    }

    pub fn distinct_styles(&self) -> usize {
        self.map.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleDescriptor {
    font: Option<FontDescriptor>,
    fill: Option<FillDescriptor>,
    borders: Option<BordersDescriptor>,
    alignment: Option<AlignmentDescriptor>,
    number_format: Option<String>,
    protection: Option<ProtectionDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct FontDescriptor {
    name: Option<String>,
    size: Option<f64>,
    bold: Option<bool>,
    italic: Option<bool>,
    underline: Option<String>,
    strikethrough: Option<bool>,
    vertical_alignment: Option<String>,
    scheme: Option<String>,
    family: Option<i32>,
    charset: Option<i32>,
    color: Option<ColorDescriptor>,
}

/// Colors carry more identity than their argb string: indexed palette
/// entries, theme references and tints all render differently and must
/// keep distinct fingerprints.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct ColorDescriptor {
    argb: Option<String>,
    indexed: Option<u32>,
    theme_index: Option<u32>,
    tint: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
enum FillDescriptor {
    Pattern(PatternFillDescriptor),
    Gradient(GradientFillDescriptor),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct PatternFillDescriptor {
    pattern_type: Option<String>,
    foreground_color: Option<ColorDescriptor>,
    background_color: Option<ColorDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct GradientFillDescriptor {
    degree: Option<f64>,
    stops: Vec<GradientStopDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct GradientStopDescriptor {
    position: f64,
    color: Option<ColorDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct BorderSideDescriptor {
    style: Option<String>,
    color: Option<ColorDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct BordersDescriptor {
    left: Option<BorderSideDescriptor>,
    right: Option<BorderSideDescriptor>,
    top: Option<BorderSideDescriptor>,
    bottom: Option<BorderSideDescriptor>,
    diagonal: Option<BorderSideDescriptor>,
    vertical: Option<BorderSideDescriptor>,
    horizontal: Option<BorderSideDescriptor>,
    diagonal_up: Option<bool>,
    diagonal_down: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct AlignmentDescriptor {
    horizontal: Option<String>,
    vertical: Option<String>,
    wrap_text: Option<bool>,
    text_rotation: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ProtectionDescriptor {
    locked: Option<bool>,
    hidden: Option<bool>,
}

pub fn descriptor_from_style(style: &Style) -> StyleDescriptor {
    let font = style.get_font().and_then(descriptor_from_font);
    let fill = style.get_fill().and_then(descriptor_from_fill);
    let borders = style.get_borders().and_then(|borders| {
        let descriptor = BordersDescriptor {
            left: descriptor_from_border_side(borders.get_left_border()),
            right: descriptor_from_border_side(borders.get_right_border()),
            top: descriptor_from_border_side(borders.get_top_border()),
            bottom: descriptor_from_border_side(borders.get_bottom_border()),
            diagonal: descriptor_from_border_side(borders.get_diagonal_border()),
            vertical: descriptor_from_border_side(borders.get_vertical_border()),
            horizontal: descriptor_from_border_side(borders.get_horizontal_border()),
            diagonal_up: if *borders.get_diagonal_up() {
                Some(true)
            } else {
                None
            },
            diagonal_down: if *borders.get_diagonal_down() {
                Some(true)
            } else {
                None
            },
        };

        if descriptor.is_empty() {
            None
        } else {
            Some(descriptor)
        }
    });
    let alignment = style.get_alignment().and_then(descriptor_from_alignment);
    let number_format = style.get_number_format().and_then(|fmt| {
        let code = fmt.get_format_code();
        if code.eq_ignore_ascii_case("general") {
            None
        } else {
            Some(code.to_string())
        }
    });
    let protection = style.get_protection().and_then(descriptor_from_protection);

    StyleDescriptor {
        font,
        fill,
        borders,
        alignment,
        number_format,
        protection,
    }
}

fn descriptor_from_color(color: &Color) -> Option<ColorDescriptor> {
    let descriptor = ColorDescriptor {
        argb: Some(color.get_argb().to_string()).filter(|s| !s.is_empty()),
        indexed: Some(*color.get_indexed()).filter(|v| *v != 0),
        theme_index: Some(*color.get_theme_index()).filter(|v| *v != 0),
        tint: Some(*color.get_tint()).filter(|v| *v != 0.0),
    };

    if descriptor.is_empty() {
        // An explicit theme 0 reads back through every accessor as the
        // default; only the struct comparison still sees it.
        if color != &Color::default() {
            return Some(ColorDescriptor {
                theme_index: Some(0),
                ..descriptor
            });
        }
        return None;
    }
    Some(descriptor)
}

fn descriptor_from_font(font: &Font) -> Option<FontDescriptor> {
    let bold = *font.get_bold();
    let italic = *font.get_italic();
    let underline = font.get_underline();
    let strikethrough = *font.get_strikethrough();
    let vertical = font.get_vertical_text_alignment().get_val();
    let scheme = font.get_scheme();

    let descriptor = FontDescriptor {
        name: Some(font.get_name().to_string()).filter(|s| !s.is_empty()),
        size: Some(*font.get_size()).filter(|s| *s > 0.0),
        bold: if bold { Some(true) } else { None },
        italic: if italic { Some(true) } else { None },
        underline: if underline.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(underline.to_string())
        },
        strikethrough: if strikethrough { Some(true) } else { None },
        vertical_alignment: if *vertical == VerticalAlignmentRunValues::Baseline {
            None
        } else {
            Some(vertical.get_value_string().to_string())
        },
        scheme: if scheme.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(scheme.to_string())
        },
        family: Some(*font.get_family()).filter(|v| *v != 0),
        charset: Some(*font.get_charset()).filter(|v| *v != 0),
        color: descriptor_from_color(font.get_color()),
    };

    if descriptor.is_empty() {
        None
    } else {
        Some(descriptor)
    }
}

fn descriptor_from_fill(fill: &Fill) -> Option<FillDescriptor> {
    if let Some(pattern) = fill.get_pattern_fill() {
        let kind = pattern.get_pattern_type().get_value_string();
        let fg = pattern.get_foreground_color().and_then(descriptor_from_color);
        let bg = pattern.get_background_color().and_then(descriptor_from_color);

        if kind.eq_ignore_ascii_case("none") && fg.is_none() && bg.is_none() {
            return None;
        }

        return Some(FillDescriptor::Pattern(PatternFillDescriptor {
            pattern_type: if kind.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(kind.to_string())
            },
            foreground_color: fg,
            background_color: bg,
        }));
    }

    if let Some(gradient) = fill.get_gradient_fill() {
        let stops: Vec<GradientStopDescriptor> = gradient
            .get_gradient_stop()
            .iter()
            .map(|stop| GradientStopDescriptor {
                position: *stop.get_position(),
                color: descriptor_from_color(stop.get_color()),
            })
            .collect();

        let degree = *gradient.get_degree();
        if stops.is_empty() && degree == 0.0 {
            return None;
        }

        return Some(FillDescriptor::Gradient(GradientFillDescriptor {
            degree: Some(degree).filter(|d| *d != 0.0),
            stops,
        }));
    }

    None
}

fn descriptor_from_border_side(border: &Border) -> Option<BorderSideDescriptor> {
    let style = border.get_border_style();
    let style = if style.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(style.to_string())
    };
    let color = descriptor_from_color(border.get_color());

    let descriptor = BorderSideDescriptor { style, color };
    if descriptor.is_empty() {
        None
    } else {
        Some(descriptor)
    }
}

fn descriptor_from_alignment(alignment: &umya_spreadsheet::Alignment) -> Option<AlignmentDescriptor> {
    let horizontal = if alignment.get_horizontal() != &HorizontalAlignmentValues::General {
        Some(alignment.get_horizontal().get_value_string().to_string())
    } else {
        None
    };
    let vertical = if alignment.get_vertical() != &VerticalAlignmentValues::Bottom {
        Some(alignment.get_vertical().get_value_string().to_string())
    } else {
        None
    };
    let wrap_text = if *alignment.get_wrap_text() {
        Some(true)
    } else {
        None
    };
    let text_rotation = if *alignment.get_text_rotation() != 0 {
        Some(*alignment.get_text_rotation())
    } else {
        None
    };

    let descriptor = AlignmentDescriptor {
        horizontal,
        vertical,
        wrap_text,
        text_rotation,
    };
    if descriptor.is_empty() {
        None
    } else {
        Some(descriptor)
    }
}

fn descriptor_from_protection(protection: &Protection) -> Option<ProtectionDescriptor> {
    // get_hidden takes &mut self upstream, so read from a local clone.
    let mut protection = protection.clone();
    // Cells are locked and visible by default; only deviations matter.
    let locked = if *protection.get_locked() {
        None
    } else {
        Some(false)
    };
    let hidden = if *protection.get_hidden() {
        Some(true)
    } else {
        None
    };

    if locked.is_none() && hidden.is_none() {
        None
    } else {
        Some(ProtectionDescriptor { locked, hidden })
    }
}

trait IsEmpty {
    fn is_empty(&self) -> bool;
}

impl IsEmpty for FontDescriptor {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.size.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.strikethrough.is_none()
            && self.vertical_alignment.is_none()
            && self.scheme.is_none()
            && self.family.is_none()
            && self.charset.is_none()
            && self.color.is_none()
    }
}

impl IsEmpty for ColorDescriptor {
    fn is_empty(&self) -> bool {
        self.argb.is_none()
            && self.indexed.is_none()
            && self.theme_index.is_none()
            && self.tint.is_none()
    }
}

impl IsEmpty for BorderSideDescriptor {
    fn is_empty(&self) -> bool {
        self.style.is_none() && self.color.is_none()
    }
}

impl IsEmpty for BordersDescriptor {
    fn is_empty(&self) -> bool {
        self.left.is_none()
            && self.right.is_none()
            && self.top.is_none()
            && self.bottom.is_none()
            && self.diagonal.is_none()
            && self.vertical.is_none()
            && self.horizontal.is_none()
            && self.diagonal_up.is_none()
            && self.diagonal_down.is_none()
    }
}

impl IsEmpty for AlignmentDescriptor {
    fn is_empty(&self) -> bool {
        self.horizontal.is_none()
            && self.vertical.is_none()
            && self.wrap_text.is_none()
            && self.text_rotation.is_none()
    }
}
