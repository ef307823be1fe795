mod common;

use bikeshare_explorer::{
    aggregate::Statistic,
    config::{DashboardConfig, DatasetKind},
    context::DashboardContext,
    data::Value,
    loader::{LoadOptions, load_table},
    report::{build_report, render_report},
    stats::ColumnSummary,
};
use chrono::NaiveDate;

use common::{DAY_CSV, TestWorkspace};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn loaded_context(workspace: &TestWorkspace) -> DashboardContext {
    let config = DashboardConfig::load(&workspace.write_dashboard()).expect("config");
    DashboardContext::load(&config, &DatasetKind::ALL, &LoadOptions::default()).expect("context")
}

#[test]
fn report_covers_every_configured_view() {
    let workspace = TestWorkspace::new();
    let ctx = loaded_context(&workspace);
    let report = build_report(&ctx, None, None).expect("report");

    assert_eq!(report.datasets.len(), 3);
    assert_eq!(report.grouped.len(), 6);
    assert_eq!(report.pivots.len(), 4);

    let weather_hourly = &report.grouped[1].aggregate;
    assert_eq!(
        weather_hourly.get(&[Value::Integer(1)], Statistic::Sum),
        Some(46.0)
    );
    assert_eq!(
        weather_hourly.get(&[Value::Integer(2)], Statistic::Std),
        Some(0.0)
    );

    let day_weather = &report.pivots[2].pivot;
    assert_eq!(day_weather.tick_labels(), vec!["January 2011", "February 2011"]);
    assert_eq!(day_weather.column(&Value::Integer(1)), Some(vec![1000.0, 700.0]));
    assert_eq!(day_weather.column(&Value::Integer(2)), Some(vec![1000.0, 0.0]));
}

#[test]
fn narrowed_range_changes_every_view() {
    let workspace = TestWorkspace::new();
    let ctx = loaded_context(&workspace);
    let report = build_report(&ctx, Some(ymd(2011, 2, 1)), Some(ymd(2011, 2, 28))).expect("report");

    let day = report
        .datasets
        .iter()
        .find(|d| d.dataset == DatasetKind::Day)
        .expect("day overview");
    assert_eq!(day.rows, 5);
    assert_eq!(day.selected_rows, 2);

    let day_weather = &report.pivots[2].pivot;
    assert_eq!(day_weather.tick_labels(), vec!["February 2011"]);
    assert_eq!(
        day_weather.categories(),
        &[Value::Integer(1), Value::Integer(3)]
    );
    assert_eq!(report.pivots[2].chart.series[1].label, "Light Rain/Snow");
}

#[test]
fn day_only_context_skips_merged_views() {
    let workspace = TestWorkspace::new();
    let day = workspace.write("day.csv", DAY_CSV);
    let table = load_table(&day, &LoadOptions::default()).expect("load day");
    let ctx = DashboardContext::from_tables("dteday", [(DatasetKind::Day, table)]);

    let report = build_report(&ctx, None, None).expect("report");
    assert!(report.grouped.is_empty());
    assert_eq!(report.pivots.len(), 2);
    let rendered = render_report(&report);
    assert!(rendered.contains("Rentals by weather (day data)"));
    assert!(rendered.contains("2 (Mist/Cloudy)"));
    assert!(!rendered.contains("hourly"));
}

#[test]
fn merged_dataset_without_expected_columns_fails() {
    let workspace = TestWorkspace::new();
    let merged = workspace.write("merged.csv", DAY_CSV);
    let table = load_table(&merged, &LoadOptions::default()).expect("load");
    let ctx = DashboardContext::from_tables("dteday", [(DatasetKind::Merged, table)]);

    let err = build_report(&ctx, None, None).unwrap_err();
    assert!(format!("{err:#}").contains("season_hour"));
}

#[test]
fn reversed_range_is_rejected() {
    let workspace = TestWorkspace::new();
    let ctx = loaded_context(&workspace);
    let err = build_report(&ctx, Some(ymd(2011, 3, 1)), Some(ymd(2011, 1, 1))).unwrap_err();
    assert!(format!("{err:#}").contains("after end date"));
}

#[test]
fn merged_and_day_data_are_profiled() {
    let workspace = TestWorkspace::new();
    let ctx = loaded_context(&workspace);
    let report = build_report(&ctx, None, None).expect("report");

    let kinds: Vec<_> = report.profiles.iter().map(|p| p.dataset).collect();
    assert_eq!(kinds, vec![DatasetKind::Merged, DatasetKind::Day]);

    let merged = &report.profiles[0];
    assert_eq!(merged.instant_unique, Some(true));
    assert_eq!(merged.sample.len(), 4);
    assert_eq!(merged.summaries.len(), merged.headers.len());
    let cnt_day: &ColumnSummary = merged
        .summaries
        .iter()
        .find(|s| s.name == "cnt_day")
        .expect("cnt_day summary");
    assert_eq!(cnt_day.mean, Some(400.0));

    let day = &report.profiles[1];
    assert_eq!(day.sample.len(), 5);
    assert_eq!(day.sample[0][1], "2011-01-05");

    let rendered = render_report(&report);
    assert!(rendered.contains("Descriptive statistics of merged data"));
    assert!(rendered.contains("instant is unique: true"));
}

#[test]
fn duplicated_instant_is_reported() {
    let workspace = TestWorkspace::new();
    let day = workspace.write("day.csv", &DAY_CSV.replace("\n5,2011-02-12", "\n4,2011-02-12"));
    let table = load_table(&day, &LoadOptions::default()).expect("load day");
    let ctx = DashboardContext::from_tables("dteday", [(DatasetKind::Day, table)]);

    let report = build_report(&ctx, None, None).expect("report");
    assert_eq!(report.profiles.len(), 1);
    assert_eq!(report.profiles[0].instant_unique, Some(false));
}

#[test]
fn overview_range_is_clamped_to_the_data() {
    let workspace = TestWorkspace::new();
    let ctx = loaded_context(&workspace);
    let report = build_report(&ctx, Some(ymd(2010, 1, 1)), Some(ymd(2011, 1, 31))).expect("report");

    let day = report
        .datasets
        .iter()
        .find(|d| d.dataset == DatasetKind::Day)
        .and_then(|d| d.range)
        .expect("day range");
    assert_eq!(day.start(), ymd(2011, 1, 5));
    assert_eq!(day.end(), ymd(2011, 1, 31));
}

#[test]
fn charts_carry_per_view_axis_limits_and_legends() {
    let workspace = TestWorkspace::new();
    let ctx = loaded_context(&workspace);
    let report = build_report(&ctx, None, None).expect("report");

    let merged_weather = &report.pivots[0].chart;
    assert_eq!(merged_weather.y_max, None);
    assert_eq!(merged_weather.legend_title, "Weather Type");

    let merged_workingday = &report.pivots[1].chart;
    assert_eq!(merged_workingday.y_max, Some(4_000_000.0));
    assert_eq!(merged_workingday.y_tick_step, Some(1_000_000.0));
    assert_eq!(merged_workingday.legend_title, "Working Day Status");

    let day_workingday = &report.pivots[3].chart;
    let y_max = day_workingday.y_max.expect("headroom limit");
    assert!((y_max - 1650.0).abs() < 1e-9);
}
