//! Settings directives applied to every panel.
//!
//! One directive per line, whitespace separated:
//!
//! ```text
//! style dark
//! ylog
//! xmin 10
//! ymax 2.5
//! legend lower right
//! ```
//!
//! Lines with more than three tokens, unknown keywords or unparsable values
//! are skipped.

/// Figure-wide visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    Dark,
    #[default]
    Classic,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderDirective {
    Style(Style),
    XMin(f64),
    XMax(f64),
    YMin(f64),
    YMax(f64),
    YLog,
    Legend(String),
}

/// Parse one settings line.
pub fn parse_directive(line: &str) -> Option<RenderDirective> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if !(1..=3).contains(&tokens.len()) {
        return None;
    }
    let number = || tokens.get(1).and_then(|t| t.parse::<f64>().ok());

    match tokens[0] {
        "style" => tokens.get(1).map(|arg| {
            if *arg == "dark" {
                RenderDirective::Style(Style::Dark)
            } else {
                RenderDirective::Style(Style::Classic)
            }
        }),
        "ylog" => Some(RenderDirective::YLog),
        "xmin" => number().map(RenderDirective::XMin),
        "xmax" => number().map(RenderDirective::XMax),
        "ymin" => number().map(RenderDirective::YMin),
        "ymax" => number().map(RenderDirective::YMax),
        "legend" => {
            let location = tokens[1..].join(" ");
            (!location.is_empty()).then_some(RenderDirective::Legend(location))
        }
        _ => None,
    }
}

/// Parse settings lines in order, dropping anything malformed.
pub fn parse_directives<I, S>(lines: I) -> Vec<RenderDirective>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_directive(line.as_ref()))
        .collect()
}

/// Style for the whole figure. The last `style` line wins.
pub fn figure_style(directives: &[RenderDirective]) -> Style {
    directives
        .iter()
        .filter_map(|d| match d {
            RenderDirective::Style(style) => Some(*style),
            _ => None,
        })
        .next_back()
        .unwrap_or_default()
}

/// Where a legend box sits inside a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendLocation {
    #[default]
    UpperLeft,
    UpperRight,
    UpperCenter,
    LowerLeft,
    LowerRight,
    LowerCenter,
    CenterLeft,
    CenterRight,
    Center,
}

impl LegendLocation {
    /// Accepts matplotlib location names and codes. `best` maps to upper left.
    pub fn parse(location: &str) -> Option<Self> {
        let location = match location.trim() {
            "best" | "0" => Self::UpperLeft,
            "upper right" | "1" => Self::UpperRight,
            "upper left" | "2" => Self::UpperLeft,
            "lower left" | "3" => Self::LowerLeft,
            "lower right" | "4" => Self::LowerRight,
            "right" | "5" | "center right" | "7" => Self::CenterRight,
            "center left" | "6" => Self::CenterLeft,
            "lower center" | "8" => Self::LowerCenter,
            "upper center" | "9" => Self::UpperCenter,
            "center" | "10" => Self::Center,
            _ => return None,
        };
        Some(location)
    }
}

/// Resolved axis state of one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub y_log: bool,
    pub legend: LegendLocation,
}

impl AxisBounds {
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            x,
            y,
            y_log: false,
            legend: LegendLocation::default(),
        }
    }

    /// Apply one directive. Returns false when it cannot be placed on this panel,
    /// in which case the bounds are left untouched.
    ///
    /// `min_positive_y` is the smallest positive sample drawn, used as the lower
    /// bound when switching to a log axis that currently starts at or below zero.
    pub fn apply(&mut self, directive: &RenderDirective, min_positive_y: Option<f64>) -> bool {
        match directive {
            // figure-wide, handled before any panel exists
            RenderDirective::Style(_) => true,
            RenderDirective::XMin(v) => Self::tighten(&mut self.x, Some(*v), None),
            RenderDirective::XMax(v) => Self::tighten(&mut self.x, None, Some(*v)),
            RenderDirective::YMin(v) => Self::tighten(&mut self.y, Some(*v), None),
            RenderDirective::YMax(v) => Self::tighten(&mut self.y, None, Some(*v)),
            RenderDirective::YLog => {
                if self.y.0 <= 0.0 {
                    match min_positive_y {
                        Some(lo) if lo < self.y.1 => self.y.0 = lo,
                        _ => return false,
                    }
                }
                self.y_log = true;
                true
            }
            RenderDirective::Legend(location) => match LegendLocation::parse(location) {
                Some(loc) => {
                    self.legend = loc;
                    true
                }
                None => false,
            },
        }
    }

    /// Apply directives in order, skipping the ones that do not fit.
    pub fn apply_all(&mut self, directives: &[RenderDirective], min_positive_y: Option<f64>) {
        for directive in directives {
            if !self.apply(directive, min_positive_y) {
                tracing::debug!(?directive, bounds = ?self, "skipping directive for panel");
            }
        }
    }

    fn tighten(range: &mut (f64, f64), lo: Option<f64>, hi: Option<f64>) -> bool {
        let new_lo = lo.map_or(range.0, |v| range.0.max(v));
        let new_hi = hi.map_or(range.1, |v| range.1.min(v));
        if !(new_lo.is_finite() && new_hi.is_finite() && new_lo < new_hi) {
            return false;
        }
        *range = (new_lo, new_hi);
        true
    }
}
