use std::path::Path;

use plotters::prelude::*;
use time::Date;

use super::{ChartData, PresenterError, SeriesColor};

fn rgb(color: SeriesColor) -> RGBColor {
    match color {
        SeriesColor::Blue => BLUE,
        SeriesColor::Green => GREEN,
        SeriesColor::Red => RED,
    }
}

fn draw_err<E: std::fmt::Display>(e: E) -> PresenterError {
    PresenterError::Draw(e.to_string())
}

fn day_label(day: i32) -> String {
    Date::from_julian_day(day)
        .map(|d| d.to_string())
        .unwrap_or_default()
}

/// Draw `chart` as an SVG file at `path`, creating the parent directory if
/// needed. Dates are plotted as Julian day numbers and labelled as ISO dates.
pub fn render_svg(chart: &ChartData, path: &Path, size: (u32, u32)) -> Result<(), PresenterError> {
    let (Some((first, last)), Some((y_lo, y_hi))) = (chart.x_bounds(), chart.y_bounds()) else {
        return Err(PresenterError::Draw("nothing to plot".to_string()));
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| PresenterError::OutputDir {
            path: dir.display().to_string(),
            source,
        })?;
    }

    let x_lo = first.to_julian_day();
    let x_hi = last.to_julian_day().max(x_lo + 1);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(draw_err)?;

    ctx.configure_mesh()
        .x_desc(chart.x_label)
        .y_desc(chart.y_label)
        .x_labels(8)
        .x_label_formatter(&|x| day_label(*x))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()
        .map_err(draw_err)?;

    let line = rgb(chart.line_color);
    ctx.draw_series(LineSeries::new(
        chart.history.iter().map(|(d, v)| (d.to_julian_day(), *v)),
        line.stroke_width(1),
    ))
    .map_err(draw_err)?
    .label(chart.line_label)
    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line.stroke_width(2)));

    for marker in &chart.markers {
        let color = rgb(marker.color);
        ctx.draw_series(std::iter::once(Circle::new(
            (marker.date.to_julian_day(), marker.value_mw),
            6,
            color.filled(),
        )))
        .map_err(draw_err)?
        .label(marker.label)
        .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}
