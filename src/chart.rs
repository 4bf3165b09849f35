use crate::errors::{BenchlensError, BenchlensResult};
use crate::samples::{CacheMissSample, LEVEL_LABELS};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};

/// Chart configuration. The math labels flag is carried here explicitly
/// instead of in process-wide state so two plots in one process can differ.
#[derive(Debug)]
pub struct PlotConfig {
    pub title: Option<String>,
    pub x_title: String,
    pub y_title: String,
    /// Render axis tick labels in superscript scientific notation.
    pub math_labels: bool,
    /// Explicit x axis values, one per sample; sequential 0, 1, 2, … when
    /// absent. An explicit list must match the sample count exactly.
    pub x_values: Option<Vec<u64>>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            title: None,
            x_title: "Cache size".to_string(),
            y_title: "Cache misses".to_string(),
            math_labels: false,
            x_values: None,
        }
    }
}

/// Resolve the x axis index for `sample_count` samples: the caller supplied
/// values, or the sequence positions when there are none.
pub fn cache_index(sample_count: usize, x_values: Option<Vec<u64>>) -> BenchlensResult<Vec<u64>> {
    match x_values {
        Some(values) => {
            if values.len() != sample_count {
                return Err(BenchlensError::DimensionMismatch {
                    index_len: values.len(),
                    sample_count,
                });
            }
            Ok(values)
        }
        None => Ok((0..sample_count as u64).collect()),
    }
}

/// The three per-level miss count series, ready to render as a line chart.
#[derive(Debug)]
pub struct MissChart {
    points: [Vec<(f64, f64)>; 3],
    visible: [bool; 3],
    title: Option<String>,
    x_title: String,
    y_title: String,
    math_labels: bool,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl MissChart {
    pub fn new(samples: &[CacheMissSample], mut config: PlotConfig) -> BenchlensResult<MissChart> {
        let index = cache_index(samples.len(), config.x_values.take())?;

        let mut points: [Vec<(f64, f64)>; 3] = Default::default();
        for (level, series) in points.iter_mut().enumerate() {
            *series = index
                .iter()
                .zip(samples)
                .map(|(x, sample)| (*x as f64, sample.level(level) as f64))
                .collect();
        }

        let x_lo = index.iter().min().copied().unwrap_or(0) as f64;
        let x_hi = index.iter().max().copied().unwrap_or(0) as f64;
        let y_hi = samples
            .iter()
            .flat_map(|s| s.counts())
            .max()
            .unwrap_or(0) as f64;

        Ok(MissChart {
            points,
            visible: [true; 3],
            title: config.title,
            x_title: config.x_title,
            y_title: config.y_title,
            math_labels: config.math_labels,
            x_bounds: pad_bounds(x_lo, x_hi),
            y_bounds: pad_bounds(0.0, y_hi),
        })
    }

    /// Show or hide one level's series. Out of range levels are ignored.
    pub fn toggle_level(&mut self, level: usize) {
        if let Some(visible) = self.visible.get_mut(level) {
            *visible = !*visible;
        }
    }

    pub fn is_visible(&self, level: usize) -> bool {
        self.visible[level]
    }

    pub fn render(&self, frame: &mut Frame, theme: &Theme) {
        let datasets = self
            .points
            .iter()
            .enumerate()
            .filter(|(level, _)| self.visible[*level])
            .map(|(level, series)| {
                Dataset::default()
                    .name(LEVEL_LABELS[level])
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(theme.series[level]))
                    .data(series)
            })
            .collect::<Vec<_>>();

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border));
        if let Some(title) = &self.title {
            block = block.title(Span::styled(
                title.as_str(),
                Style::default().fg(theme.title),
            ));
        }

        let label_style = Style::default().fg(theme.labels);
        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title(Span::styled(self.x_title.as_str(), label_style))
                    .style(Style::default().fg(theme.axis))
                    .bounds(self.x_bounds)
                    .labels(tick_labels(self.x_bounds, self.math_labels)),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(self.y_title.as_str(), label_style))
                    .style(Style::default().fg(theme.axis))
                    .bounds(self.y_bounds)
                    .labels(tick_labels(self.y_bounds, self.math_labels)),
            );

        frame.render_widget(chart, frame.area());
    }
}

/// Degenerate bounds confuse the chart's coordinate mapping; widen them by
/// one unit.
fn pad_bounds(lo: f64, hi: f64) -> [f64; 2] {
    if lo < hi { [lo, hi] } else { [lo, lo + 1.0] }
}

fn tick_labels([lo, hi]: [f64; 2], math: bool) -> Vec<String> {
    [lo, (lo + hi) / 2.0, hi]
        .iter()
        .map(|v| fmt_tick(*v, math))
        .collect()
}

/// One tick label: a plain integer, or mantissa-times-power-of-ten with a
/// superscript exponent when math labels are on.
fn fmt_tick(value: f64, math: bool) -> String {
    if !math {
        return format!("{value:.0}");
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    let mantissa = value / 10f64.powi(exponent);
    format!("{mantissa:.1}×10{}", superscript(exponent))
}

fn superscript(exponent: i32) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    let mut out = String::new();
    if exponent < 0 {
        out.push('⁻');
    }
    for c in exponent.unsigned_abs().to_string().chars() {
        out.push(DIGITS[c as usize - '0' as usize]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Position;

    fn samples() -> Vec<CacheMissSample> {
        vec![
            CacheMissSample::new([3, 5, 2]),
            CacheMissSample::new([1, 9, 0]),
        ]
    }

    fn buffer_text(buf: &Buffer) -> String {
        let mut text = String::new();
        let area = buf.area();
        for y in 0..area.bottom() {
            for x in 0..area.right() {
                text.push_str(buf[Position::new(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(chart: &MissChart) -> String {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| chart.render(f, &Theme::dark())).unwrap();
        buffer_text(&terminal.backend().buffer().clone())
    }

    #[test]
    fn test_sequential_index() {
        let chart = MissChart::new(&samples(), PlotConfig::default()).unwrap();
        assert_eq!(chart.points[0], vec![(0.0, 3.0), (1.0, 1.0)]);
        assert_eq!(chart.points[1], vec![(0.0, 5.0), (1.0, 9.0)]);
        assert_eq!(chart.points[2], vec![(0.0, 2.0), (1.0, 0.0)]);
    }

    #[test]
    fn test_explicit_index() {
        let config = PlotConfig {
            x_values: Some(vec![16, 32]),
            ..PlotConfig::default()
        };
        let chart = MissChart::new(&samples(), config).unwrap();
        assert_eq!(chart.points[0], vec![(16.0, 3.0), (32.0, 1.0)]);
    }

    #[test]
    fn test_index_length_mismatch() {
        let config = PlotConfig {
            x_values: Some(vec![16, 32, 64]),
            ..PlotConfig::default()
        };
        let err = MissChart::new(&samples(), config).unwrap_err();
        match err {
            BenchlensError::DimensionMismatch {
                index_len,
                sample_count,
            } => {
                assert_eq!(index_len, 3);
                assert_eq!(sample_count, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cache_index_sequential() {
        assert_eq!(cache_index(3, None).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_fmt_tick_plain() {
        assert_eq!(fmt_tick(0.0, false), "0");
        assert_eq!(fmt_tick(12345.0, false), "12345");
    }

    #[test]
    fn test_fmt_tick_math() {
        assert_eq!(fmt_tick(0.0, true), "0");
        assert_eq!(fmt_tick(100.0, true), "1.0×10²");
        assert_eq!(fmt_tick(12345.0, true), "1.2×10⁴");
        assert_eq!(fmt_tick(0.5, true), "5.0×10⁻¹");
    }

    #[test]
    fn test_render_legend_and_titles() {
        let config = PlotConfig {
            title: Some("lru".to_string()),
            ..PlotConfig::default()
        };
        let chart = MissChart::new(&samples(), config).unwrap();
        let text = draw(&chart);
        assert!(text.contains("LV0"));
        assert!(text.contains("LV1"));
        assert!(text.contains("LV2"));
        assert!(text.contains("Cache size"));
        assert!(text.contains("Cache misses"));
        assert!(text.contains("lru"));
    }

    #[test]
    fn test_toggle_hides_series() {
        let mut chart = MissChart::new(&samples(), PlotConfig::default()).unwrap();
        chart.toggle_level(1);
        assert!(!chart.is_visible(1));
        let text = draw(&chart);
        assert!(text.contains("LV0"));
        assert!(!text.contains("LV1"));
        chart.toggle_level(1);
        assert!(chart.is_visible(1));
    }

    #[test]
    fn test_math_tick_rendered() {
        let big = vec![
            CacheMissSample::new([9210, 6512, 4025]),
            CacheMissSample::new([122, 60, 11]),
        ];
        let config = PlotConfig {
            math_labels: true,
            ..PlotConfig::default()
        };
        let chart = MissChart::new(&big, config).unwrap();
        let text = draw(&chart);
        assert!(text.contains("9.2×10³"));
    }
}
