use std::cell::RefCell;
use std::rc::Rc;

use gpui_charts::limits::{bar_limits, line_limits};
use gpui_charts::{
    BarChart, BarChartConfig, BarChartDelegate, BarData, Chart, Insets, LineChart,
    LineChartConfig, LineChartDelegate, LineData, Point, RenderCommand, ScatterChart,
    ScatterChartConfig, ScatterChartDelegate, ScatterData, ScreenPoint, Theme, TouchEvent,
    TouchPhase, render_frame,
};

const EPS: f32 = 1e-3;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

#[derive(Default)]
struct Touches {
    log: RefCell<Vec<(TouchPhase, usize)>>,
}

impl BarChartDelegate for Touches {
    fn did_touch(&self, item: usize) {
        self.log.borrow_mut().push((TouchPhase::Down, item));
    }

    fn did_release_touch(&self, item: usize) {
        self.log.borrow_mut().push((TouchPhase::Up, item));
    }
}

impl LineChartDelegate for Touches {
    fn did_touch(&self, point: usize) {
        self.log.borrow_mut().push((TouchPhase::Down, point));
    }
}

#[derive(Default)]
struct ScatterTouches {
    log: RefCell<Vec<(usize, usize)>>,
}

impl ScatterChartDelegate for ScatterTouches {
    fn did_touch(&self, dataset: usize, item: usize) {
        self.log.borrow_mut().push((dataset, item));
    }
}

fn bar_chart(data: &Rc<BarData>, config: BarChartConfig) -> BarChart {
    let mut chart = BarChart::with_config(config.with_insets(Insets::ZERO)).unwrap();
    chart.set_datasource(Rc::downgrade(data));
    chart.set_size(360.0, 220.0);
    chart.layout();
    chart
}

#[test]
fn stacked_pairs_double_single_height() {
    let data = Rc::new(BarData::new(vec![vec![10.0; 6], vec![10.0; 6]]).unwrap());
    let chart = bar_chart(&data, BarChartConfig::default().with_stacked(true));

    assert!((chart.limits().max - 21.0).abs() < 1e-9);
    let single = chart.points()[0].height;
    for item in 0..6 {
        let total: f32 = chart
            .points()
            .iter()
            .filter(|bar| bar.item == item)
            .map(|bar| bar.height)
            .sum();
        assert!(close(total, single * 2.0), "item {item}: {total} vs {single}");
    }
    assert!(chart.points().iter().all(|bar| bar.y >= 0.0));
}

#[test]
fn grouped_bars_match_value_ratio() {
    let data = Rc::new(BarData::new(vec![vec![20.0, 200.0]]).unwrap());
    let chart = bar_chart(&data, BarChartConfig::default().with_shift(0.0));
    for (bar, value) in chart.points().iter().zip([20.0_f32, 200.0]) {
        assert!(close(bar.y, 220.0 - 220.0 * (value / 200.0)));
    }
}

#[test]
fn touch_past_last_group_resolves_to_last_item() {
    let data = Rc::new(BarData::new(vec![vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0]]).unwrap());
    let touches = Rc::new(Touches::default());
    let mut chart = bar_chart(&data, BarChartConfig::default());
    chart.set_delegate(Rc::downgrade(&touches));

    let far_right = ScreenPoint::new(10_000.0, 50.0);
    assert!(chart.touch(TouchEvent::new(TouchPhase::Down, far_right)));
    assert!(chart.touch(TouchEvent::new(TouchPhase::Down, far_right)));
    assert!(chart.touch(TouchEvent::new(TouchPhase::Up, far_right)));
    assert_eq!(
        *touches.log.borrow(),
        vec![(TouchPhase::Down, 5), (TouchPhase::Down, 5), (TouchPhase::Up, 5)]
    );
}

#[test]
fn repeated_line_touch_is_stable() {
    let data = Rc::new(LineData::new(vec![vec![2.0, 7.0, 1.0, 8.0, 2.0, 8.0]]).unwrap());
    let touches = Rc::new(Touches::default());
    let mut chart =
        LineChart::with_config(LineChartConfig::default().with_insets(Insets::ZERO)).unwrap();
    chart.set_datasource(Rc::downgrade(&data));
    chart.set_delegate(Rc::downgrade(&touches));
    chart.set_size(250.0, 100.0);
    chart.layout();

    let at = ScreenPoint::new(137.0, 12.0);
    for _ in 0..3 {
        assert!(chart.touch(TouchEvent::new(TouchPhase::Down, at)));
    }
    let log = touches.log.borrow();
    assert_eq!(log.len(), 3);
    assert!(log.iter().all(|entry| *entry == log[0]));
}

#[test]
fn repeated_scatter_touch_is_stable() {
    let data = Rc::new(
        ScatterData::new(vec![
            vec![Point::new(3.0, 4.0), Point::new(9.0, 1.0), Point::new(5.0, 5.0)],
            vec![Point::new(7.0, 2.0), Point::new(2.0, 8.0)],
        ])
        .unwrap(),
    );
    let touches = Rc::new(ScatterTouches::default());
    let mut chart =
        ScatterChart::with_config(ScatterChartConfig::default().with_insets(Insets::ZERO))
            .unwrap();
    chart.set_datasource(Rc::downgrade(&data));
    chart.set_delegate(Rc::downgrade(&touches));
    chart.set_size(240.0, 160.0);
    chart.layout();

    let at = ScreenPoint::new(101.0, 77.0);
    for _ in 0..3 {
        assert!(chart.touch(TouchEvent::new(TouchPhase::Down, at)));
    }
    let log = touches.log.borrow();
    assert_eq!(log.len(), 3);
    assert!(log.iter().all(|entry| *entry == log[0]));
}

#[test]
fn line_limits_expand_around_mixed_signs() {
    let limits = line_limits(&[vec![5.0, -5.0]], false);
    assert!((limits.min + 6.0).abs() < 1e-9);
    assert!((limits.max - 6.0).abs() < 1e-9);

    let data = Rc::new(LineData::new(vec![vec![5.0, -5.0]]).unwrap());
    let mut chart = LineChart::new();
    chart.set_datasource(Rc::downgrade(&data));
    chart.set_size(200.0, 100.0);
    chart.layout();
    assert_eq!(chart.limits(), limits);
}

#[test]
fn empty_datasets_lay_out_and_draw() {
    let data = Rc::new(BarData::new(vec![vec![], vec![]]).unwrap());
    let mut chart = bar_chart(&data, BarChartConfig::default());
    assert!(chart.points().is_empty());
    assert!(chart.layers().is_empty());
    assert_eq!(bar_limits(&[vec![], vec![]], false, 0.05).max, 0.0);

    let frame = render_frame(&chart, chart.layers(), &Theme::default());
    assert!(frame.commands().contains(&RenderCommand::ClipEnd));
    assert!(!chart.touch(TouchEvent::new(TouchPhase::Down, ScreenPoint::new(20.0, 20.0))));
}

#[test]
fn config_change_relayouts_once() {
    let data = Rc::new(BarData::new(vec![vec![1.0, 2.0]]).unwrap());
    let mut chart = bar_chart(&data, BarChartConfig::default());
    assert!(chart.layout().is_none());

    let config = chart.config().clone().with_spacing(4.0).with_bar_width(12.0);
    chart.set_config(config).unwrap();
    chart.set_size(400.0, 220.0);
    assert!(chart.layout().is_some());
    assert!(chart.layout().is_none());
    assert!(close(chart.points()[1].x, 12.0 + 4.0 * 2.0));
}
