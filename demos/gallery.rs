use std::rc::Rc;

use gpui::{AppContext, Application, Bounds, Entity, WindowBounds, WindowOptions, div, px, size};
use gpui::prelude::*;

use gpui_charts::{
    BarChart, BarChartConfig, BarChartDelegate, BarData, ChartView, Color, HeatMapChart,
    HeatMapData, Legend, LegendData, LegendDelegate, LineChart, LineChartConfig,
    LineChartDelegate, LineData, MarkerShape, PieChart, PieChartConfig, PieChartDelegate, PieData,
    Point, ScatterChart, ScatterChartDelegate, ScatterData,
};

struct Logger;

impl BarChartDelegate for Logger {
    fn did_touch(&self, item: usize) {
        tracing::info!(item, "bar touched");
    }

    fn did_release_touch(&self, item: usize) {
        tracing::info!(item, "bar released");
    }
}

impl LineChartDelegate for Logger {
    fn did_release_touch(&self, point: usize) {
        tracing::info!(point, "line point released");
    }
}

impl ScatterChartDelegate for Logger {
    fn did_release_touch(&self, dataset: usize, item: usize) {
        tracing::info!(dataset, item, "scatter point released");
    }
}

impl PieChartDelegate for Logger {
    fn did_select(&self, slice: usize) {
        tracing::info!(slice, "slice selected");
    }
}

impl LegendDelegate for Logger {
    fn did_select(&self, item: usize) {
        tracing::info!(item, "legend row selected");
    }
}

struct Sources {
    bars: Rc<BarData>,
    lines: Rc<LineData>,
    scatter: Rc<ScatterData>,
    heat: Rc<HeatMapData>,
    pie: Rc<PieData>,
    legend: Rc<LegendData>,
    logger: Rc<Logger>,
}

struct Gallery {
    _sources: Sources,
    bar: Entity<ChartView<BarChart>>,
    line: Entity<ChartView<LineChart>>,
    scatter: Entity<ChartView<ScatterChart>>,
    heat: Entity<ChartView<HeatMapChart>>,
    pie: Entity<ChartView<PieChart>>,
    legend: Entity<ChartView<Legend>>,
}

impl gpui::Render for Gallery {
    fn render(
        &mut self,
        _window: &mut gpui::Window,
        _cx: &mut gpui::Context<Self>,
    ) -> impl gpui::IntoElement {
        div()
            .size_full()
            .flex()
            .flex_col()
            .child(
                div()
                    .flex_1()
                    .flex()
                    .child(div().flex_1().child(self.bar.clone()))
                    .child(div().flex_1().child(self.line.clone()))
                    .child(div().flex_1().child(self.scatter.clone())),
            )
            .child(
                div()
                    .flex_1()
                    .flex()
                    .child(div().flex_1().child(self.heat.clone()))
                    .child(div().flex_1().child(self.pie.clone()))
                    .child(div().flex_1().child(self.legend.clone())),
            )
    }
}

fn palette() -> [Color; 3] {
    [
        Color::from_rgb8(66, 133, 244),
        Color::from_rgb8(234, 67, 53),
        Color::from_rgb8(251, 188, 5),
    ]
}

fn sources() -> Result<Sources, gpui_charts::DataError> {
    let [blue, red, yellow] = palette();
    Ok(Sources {
        bars: Rc::new(
            BarData::new(vec![
                vec![12.0, 18.0, 9.0, 14.0, 20.0, 11.0],
                vec![6.0, 4.0, 10.0, 8.0, 5.0, 9.0],
            ])?
            .with_colors(vec![blue, red])?
            .with_item_labels(["Jan", "Feb", "Mar", "Apr", "May", "Jun"])?,
        ),
        lines: Rc::new(
            LineData::new(vec![
                (0..12).map(|i| (i as f64 * 0.6).sin() * 5.0).collect(),
                (0..12).map(|i| (i as f64 * 0.6).cos() * 3.0).collect(),
            ])?
            .with_colors(vec![blue, yellow])?,
        ),
        scatter: Rc::new(
            ScatterData::new(vec![
                (1..20)
                    .map(|i| Point::new(i as f64 * 5.0, (i as f64 * 1.7) % 13.0 + 2.0))
                    .collect(),
                (1..10)
                    .map(|i| Point::new(i as f64 * 9.0, (i as f64 * 3.1) % 7.0 + 8.0))
                    .collect(),
            ])?
            .with_colors(vec![red, blue])?
            .with_shapes(vec![MarkerShape::Circle, MarkerShape::Square])?
            .with_radii(vec![4.0, 5.0])?,
        ),
        heat: Rc::new(HeatMapData::new(
            (0..7)
                .map(|row| (0..(12 - row)).map(|col| ((row * 13 + col * 7) % 100) as f64).collect())
                .collect(),
        )?),
        pie: Rc::new(PieData::new(vec![30.0, 45.0, 25.0])?.with_colors(vec![blue, red, yellow])?),
        legend: Rc::new(LegendData::new([
            ("Product A", blue),
            ("Product B", red),
            ("Product C", yellow),
        ])),
        logger: Rc::new(Logger),
    })
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,gpui_charts=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(1080.0), px(640.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let sources = sources().expect("demo data is valid");

            let mut bar = BarChart::with_config(BarChartConfig::default().with_stacked(true))
                .expect("valid bar config");
            bar.set_datasource(Rc::downgrade(&sources.bars));
            bar.set_delegate(Rc::downgrade(&sources.logger));

            let mut line = LineChart::with_config(LineChartConfig::default().with_bezier(true))
                .expect("valid line config");
            line.set_datasource(Rc::downgrade(&sources.lines));
            line.set_delegate(Rc::downgrade(&sources.logger));

            let mut scatter = ScatterChart::new();
            scatter.set_datasource(Rc::downgrade(&sources.scatter));
            scatter.set_delegate(Rc::downgrade(&sources.logger));

            let mut heat = HeatMapChart::new();
            heat.set_datasource(Rc::downgrade(&sources.heat));

            let mut pie = PieChart::with_config(PieChartConfig::default().with_inner_radius_ratio(0.45))
                .expect("valid pie config");
            pie.set_datasource(Rc::downgrade(&sources.pie));
            pie.set_delegate(Rc::downgrade(&sources.logger));

            let mut legend = Legend::new();
            legend.set_datasource(Rc::downgrade(&sources.legend));
            legend.set_delegate(Rc::downgrade(&sources.logger));

            cx.new(|cx| Gallery {
                bar: cx.new(|_| ChartView::new(bar)),
                line: cx.new(|_| ChartView::new(line)),
                scatter: cx.new(|_| ChartView::new(scatter)),
                heat: cx.new(|_| ChartView::new(heat)),
                pie: cx.new(|_| ChartView::new(pie)),
                legend: cx.new(|_| ChartView::new(legend)),
                _sources: sources,
            })
        })
        .unwrap();
    });
}
