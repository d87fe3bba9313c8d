//! SVG drawing of a scatter chart
//!
//! Output is deterministic for a given configuration and layout, so two
//! renders of the same series produce byte-identical drawings.

use crate::chart::config::ChartSpec;
use crate::chart::layout::ChartLayout;
use crate::host::escape_html;
use crate::profile_scope;
use std::fmt::Write;

const AXIS_COLOR: &str = "rgba(0, 0, 0, 0.25)";
const TEXT_COLOR: &str = "#666";

/// Pixel coordinates with two decimals keep the markup compact.
fn px(v: f32) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub fn draw(spec: &ChartSpec, layout: &ChartLayout) -> String {
    profile_scope!("draw_svg");
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_chart(&mut out, spec, layout);
    out
}

fn write_chart(out: &mut String, spec: &ChartSpec, layout: &ChartLayout) -> std::fmt::Result {
    let plot = layout.plot;
    let scales = &spec.options.scales;

    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" role=\"img\" font-family=\"sans-serif\">",
        w = px(layout.width),
        h = px(layout.height)
    )?;

    // grid and ticks
    writeln!(out, "<g class=\"grid\" stroke=\"{}\" stroke-width=\"1\">", escape_html(&scales.x.grid.color))?;
    for tick in &layout.x_scale.ticks {
        let (x, _) = layout.project(*tick, layout.y_scale.min);
        writeln!(
            out,
            "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\"/>",
            px(plot.y),
            px(plot.bottom()),
            x = px(x)
        )?;
    }
    for tick in &layout.y_scale.ticks {
        let (_, y) = layout.project(layout.x_scale.min, *tick);
        writeln!(
            out,
            "<line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\"/>",
            px(plot.x),
            px(plot.right()),
            y = px(y)
        )?;
    }
    writeln!(out, "</g>")?;

    writeln!(
        out,
        "<rect class=\"plot-area\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\"/>",
        px(plot.x),
        px(plot.y),
        px(plot.width),
        px(plot.height),
        AXIS_COLOR
    )?;

    writeln!(
        out,
        "<g class=\"ticks\" fill=\"{}\" font-size=\"{}\">",
        TEXT_COLOR,
        px(scales.x.ticks.font.size)
    )?;
    for tick in &layout.x_scale.ticks {
        let (x, _) = layout.project(*tick, layout.y_scale.min);
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\">{}</text>",
            px(x),
            px(plot.bottom() + scales.x.ticks.font.size + 4.0),
            layout.x_scale.format_tick(*tick)
        )?;
    }
    for tick in &layout.y_scale.ticks {
        let (_, y) = layout.project(layout.x_scale.min, *tick);
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" text-anchor=\"end\">{}</text>",
            px(plot.x - 6.0),
            px(y + scales.y.ticks.font.size * 0.35),
            layout.y_scale.format_tick(*tick)
        )?;
    }
    writeln!(out, "</g>")?;

    // axis titles
    if scales.x.title.display {
        writeln!(
            out,
            "<text class=\"axis-title\" x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            px(plot.x + plot.width / 2.0),
            px(layout.height - spec.options.layout.padding.bottom - scales.x.title.padding.bottom),
            px(scales.x.title.font.size),
            TEXT_COLOR,
            escape_html(&scales.x.title.text)
        )?;
    }
    if scales.y.title.display {
        let x = spec.options.layout.padding.left + scales.y.title.padding.top + scales.y.title.font.size;
        let y = plot.y + plot.height / 2.0;
        writeln!(
            out,
            "<text class=\"axis-title\" x=\"{x}\" y=\"{y}\" transform=\"rotate(-90 {x} {y})\" text-anchor=\"middle\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            px(scales.y.title.font.size),
            TEXT_COLOR,
            escape_html(&scales.y.title.text),
            x = px(x),
            y = px(y)
        )?;
    }

    // legend
    let labels = &spec.options.plugins.legend.labels;
    let datasets = spec.datasets();
    if !layout.legend.is_empty() {
        writeln!(out, "<g class=\"legend\" font-size=\"{}\" fill=\"{}\">", px(labels.font.size), TEXT_COLOR)?;
        for item in &layout.legend {
            let Some(dataset) = datasets.get(item.dataset) else {
                continue;
            };
            writeln!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" stroke=\"{}\"/>",
                px(item.swatch.0),
                px(item.swatch.1),
                px(labels.box_width / 4.0),
                dataset.background_color,
                dataset.border_color
            )?;
            writeln!(
                out,
                "<text x=\"{}\" y=\"{}\">{}</text>",
                px(item.text.0),
                px(item.text.1),
                escape_html(&dataset.label)
            )?;
        }
        writeln!(out, "</g>")?;
    }

    // points
    for (i, dataset) in datasets.iter().enumerate() {
        writeln!(
            out,
            "<g class=\"dataset\" data-index=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\">",
            i, dataset.background_color, dataset.border_color
        )?;
        for point in &dataset.data {
            let (x, y) = layout.project(point.x, point.y);
            writeln!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"/>",
                px(x),
                px(y),
                px(dataset.point_radius)
            )?;
        }
        writeln!(out, "</g>")?;
    }

    writeln!(out, "</svg>")
}
