use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    BoxElem, BoxPlot, BoxSpread, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoint,
    PlotPoints, Points, Polygon, Text,
};

use crate::color::{respondent_fill, respondent_stroke, AVERAGE_COLOR};
use crate::state::AppState;

/// Upper end of the 1–5 Likert scale.
const SCALE_MAX: f64 = 5.0;
const PLOT_HEIGHT: f32 = 460.0;

// ---------------------------------------------------------------------------
// Radar geometry
// ---------------------------------------------------------------------------

/// Angle of spoke `i` out of `n`: first spoke straight up, then clockwise.
fn spoke_angle(i: usize, n: usize) -> f64 {
    FRAC_PI_2 - TAU * i as f64 / n as f64
}

fn polar(r: f64, theta: f64) -> [f64; 2] {
    [r * theta.cos(), r * theta.sin()]
}

/// Cartesian vertices of a radar polygon. Missing scores are skipped.
pub fn radar_points(values: &[Option<f64>]) -> Vec<[f64; 2]> {
    let n = values.len();
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|r| polar(r, spoke_angle(i, n))))
        .collect()
}

// ---------------------------------------------------------------------------
// Radar chart
// ---------------------------------------------------------------------------

pub fn radar_plot(ui: &mut Ui, state: &AppState) {
    let Some(radar) = &state.radar else {
        return;
    };
    let n = radar.dims.len();
    if n < 3 {
        return;
    }

    Plot::new("radar_plot")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-SCALE_MAX - 1.0)
        .include_x(SCALE_MAX + 1.0)
        .include_y(-SCALE_MAX - 1.0)
        .include_y(SCALE_MAX + 1.0)
        .height(PLOT_HEIGHT)
        .show(ui, |plot_ui| {
            let grid = Stroke::new(0.5, Color32::from_gray(120));

            // Rings at each scale step and one spoke per dimension.
            for step in 1..=SCALE_MAX as usize {
                let ring: PlotPoints = (0..=n)
                    .map(|i| polar(step as f64, spoke_angle(i % n, n)))
                    .collect();
                plot_ui.line(Line::new(ring).stroke(grid));
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.08, step as f64),
                        RichText::new(step.to_string()).small(),
                    )
                    .color(Color32::GRAY),
                );
            }
            for (i, dim) in radar.dims.iter().enumerate() {
                let theta = spoke_angle(i, n);
                let spoke: PlotPoints = vec![[0.0, 0.0], polar(SCALE_MAX, theta)].into();
                plot_ui.line(Line::new(spoke).stroke(grid));

                let [x, y] = polar(SCALE_MAX + 0.6, theta);
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(dim.code()).size(18.0).strong(),
                ));
            }

            for trace in &radar.rows {
                let points = radar_points(&trace.values);
                if points.len() < 3 {
                    continue;
                }
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(points))
                        .fill_color(respondent_fill())
                        .stroke(Stroke::new(0.8, respondent_stroke())),
                );
            }

            let average = radar_points(&radar.average);
            if average.len() >= 3 {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(average))
                        .name("Average")
                        .fill_color(AVERAGE_COLOR.gamma_multiply(0.25))
                        .stroke(Stroke::new(3.0, AVERAGE_COLOR)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Distribution by dimension
// ---------------------------------------------------------------------------

pub fn distribution_plot(ui: &mut Ui, state: &AppState) {
    Plot::new("distribution_plot")
        .legend(Legend::default())
        .y_axis_label("Score")
        .show_axes([false, true])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .include_y(0.0)
        .include_y(SCALE_MAX)
        .include_x(-0.6)
        .include_x(state.distributions.len() as f64 - 0.4)
        .height(PLOT_HEIGHT)
        .show(ui, |plot_ui| {
            for (i, dist) in state.distributions.iter().enumerate() {
                let x = i as f64;
                let color = state.colors.color_for(dist.dim);

                plot_ui.text(Text::new(
                    PlotPoint::new(x, 0.2),
                    RichText::new(dist.dim.code()).strong(),
                ));

                let Some(b) = dist.box_stats else {
                    continue;
                };

                let elem = BoxElem::new(x, BoxSpread::new(b.min, b.q1, b.median, b.q3, b.max))
                    .name(dist.dim.label())
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.35))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(dist.dim.code()).color(color));

                // Mean as a dashed bar, one standard deviation either side.
                let mean_line: PlotPoints = vec![[x - 0.25, b.mean], [x + 0.25, b.mean]].into();
                plot_ui.line(
                    Line::new(mean_line)
                        .color(color)
                        .style(LineStyle::dashed_dense()),
                );
                if let Some(sd) = b.std_dev {
                    let sd_line: PlotPoints =
                        vec![[x + 0.3, b.mean - sd], [x + 0.3, b.mean + sd]].into();
                    plot_ui.line(
                        Line::new(sd_line)
                            .color(color)
                            .style(LineStyle::dashed_loose()),
                    );
                }

                let points: PlotPoints = dist.values.iter().map(|&v| [x - 0.35, v]).collect();
                plot_ui.points(
                    Points::new(points)
                        .shape(MarkerShape::Circle)
                        .radius(2.0)
                        .color(color.gamma_multiply(0.6)),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_spoke_points_up() {
        let pts = radar_points(&[Some(2.0), None, None, None]);
        assert_eq!(pts.len(), 1);
        assert!(pts[0][0].abs() < 1e-12);
        assert!((pts[0][1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn missing_scores_are_skipped() {
        let values = [Some(1.0), None, Some(3.0), Some(4.0), None, Some(5.0)];
        assert_eq!(radar_points(&values).len(), 4);
    }

    #[test]
    fn spokes_go_clockwise() {
        // Second of four spokes points right.
        let [x, y] = polar(1.0, spoke_angle(1, 4));
        assert!((x - 1.0).abs() < 1e-12);
        assert!(y.abs() < 1e-12);
    }
}
