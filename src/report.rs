//! The dashboard's prepared views, computed in one pass over a
//! [`DashboardContext`].
//!
//! Every view is built before anything is printed, so a failing view (for
//! example a dataset lacking one of the expected columns) leaves no partial
//! output behind.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use crate::{
    aggregate::{GroupedAggregate, Statistic, aggregate},
    cli::ReportArgs,
    config::DatasetKind,
    context::DashboardContext,
    filter::{DateRange, filter_range},
    io_utils,
    labels::CategoryKind,
    loader::LoadOptions,
    pivot::{CategoryUniverse, MonthlyPivot, monthly_pivot},
    series::{self, AxisLimit, Chart},
    stats::{self, ColumnSummary},
    table,
};

/// Datasets profiled with sample rows and descriptive statistics, in
/// display order.
const PROFILED: [DatasetKind; 2] = [DatasetKind::Merged, DatasetKind::Day];

const PROFILE_SAMPLE_ROWS: usize = 5;

const IDENTITY_COLUMN: &str = "instant";

struct GroupedViewDef {
    dataset: DatasetKind,
    group: &'static str,
    value: &'static str,
    title: &'static str,
}

const GROUPED_VIEWS: &[GroupedViewDef] = &[
    GroupedViewDef {
        dataset: DatasetKind::Merged,
        group: "season_hour",
        value: "cnt_hour",
        title: "Statistics by season (hourly)",
    },
    GroupedViewDef {
        dataset: DatasetKind::Merged,
        group: "weathersit_hour",
        value: "cnt_hour",
        title: "Statistics by weather (hourly)",
    },
    GroupedViewDef {
        dataset: DatasetKind::Merged,
        group: "workingday_hour",
        value: "cnt_hour",
        title: "Statistics by working day (hourly)",
    },
    GroupedViewDef {
        dataset: DatasetKind::Merged,
        group: "season_day",
        value: "cnt_day",
        title: "Statistics by season (daily)",
    },
    GroupedViewDef {
        dataset: DatasetKind::Merged,
        group: "weathersit_day",
        value: "cnt_day",
        title: "Statistics by weather (daily)",
    },
    GroupedViewDef {
        dataset: DatasetKind::Merged,
        group: "workingday_day",
        value: "cnt_day",
        title: "Statistics by working day (daily)",
    },
];

struct PivotViewDef {
    dataset: DatasetKind,
    category: &'static str,
    value: &'static str,
    title: &'static str,
    limit: AxisLimit,
}

const PIVOT_VIEWS: &[PivotViewDef] = &[
    PivotViewDef {
        dataset: DatasetKind::Merged,
        category: "weathersit_hour",
        value: "cnt_hour",
        title: "Rentals by weather (merged, hourly counts)",
        limit: AxisLimit::Auto,
    },
    PivotViewDef {
        dataset: DatasetKind::Merged,
        category: "workingday_day",
        value: "cnt_day",
        title: "Rentals by working day (merged, daily counts)",
        limit: AxisLimit::Fixed {
            max: 4_000_000.0,
            step: 1_000_000.0,
        },
    },
    PivotViewDef {
        dataset: DatasetKind::Day,
        category: "weathersit",
        value: "cnt",
        title: "Rentals by weather (day data)",
        limit: AxisLimit::Auto,
    },
    PivotViewDef {
        dataset: DatasetKind::Day,
        category: "workingday",
        value: "cnt",
        title: "Rentals by working day (day data)",
        limit: AxisLimit::DEFAULT_HEADROOM,
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct DatasetOverview {
    pub dataset: DatasetKind,
    pub rows: usize,
    pub selected_rows: usize,
    pub range: Option<DateRange>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    pub dataset: DatasetKind,
    pub headers: Vec<String>,
    pub sample: Vec<Vec<String>>,
    pub summaries: Vec<ColumnSummary>,
    /// Whether `instant` holds unique values; `None` when the column is absent.
    pub instant_unique: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupedView {
    pub title: String,
    pub dataset: DatasetKind,
    pub aggregate: GroupedAggregate,
}

#[derive(Debug, Clone, Serialize)]
pub struct PivotView {
    pub title: String,
    pub dataset: DatasetKind,
    pub kind: Option<CategoryKind>,
    pub pivot: MonthlyPivot,
    pub chart: Chart,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub datasets: Vec<DatasetOverview>,
    pub profiles: Vec<DatasetProfile>,
    pub grouped: Vec<GroupedView>,
    pub pivots: Vec<PivotView>,
}

/// Builds every view whose dataset is present in `ctx`, each over that
/// dataset's rows within `[start, end]` (open bounds default to the
/// dataset's own min/max dates).
pub fn build_report(
    ctx: &DashboardContext,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DashboardReport> {
    let mut datasets = Vec::new();
    let mut selected = Vec::new();
    for kind in ctx.kinds() {
        let Some(table) = ctx.table(kind) else {
            continue;
        };
        let range = DateRange::resolve(table, start, end)
            .with_context(|| format!("Resolving date range for {kind} data"))?
            .map(|range| range.clamp_to(table));
        let subset = match &range {
            Some(range) => filter_range(table, range),
            None => table.clone(),
        };
        datasets.push(DatasetOverview {
            dataset: kind,
            rows: table.len(),
            selected_rows: subset.len(),
            range,
        });
        selected.push((kind, subset));
    }
    let subset_for = |kind: DatasetKind| {
        selected
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, table)| table)
    };

    let mut profiles = Vec::new();
    for kind in PROFILED {
        let Some(table) = subset_for(kind) else {
            continue;
        };
        let instant_unique = match table.column_index(IDENTITY_COLUMN) {
            Some(_) => Some(table.is_unique(IDENTITY_COLUMN)?),
            None => None,
        };
        let sample = table.head(PROFILE_SAMPLE_ROWS);
        profiles.push(DatasetProfile {
            dataset: kind,
            headers: table.headers().to_vec(),
            sample: sample.to_string_rows(),
            summaries: stats::describe(table),
            instant_unique,
        });
    }

    let mut grouped = Vec::new();
    for def in GROUPED_VIEWS {
        let Some(table) = subset_for(def.dataset) else {
            continue;
        };
        let result = aggregate(table, &[def.group.to_string()], def.value, &Statistic::ALL)
            .with_context(|| format!("Building view '{}'", def.title))?;
        grouped.push(GroupedView {
            title: def.title.to_string(),
            dataset: def.dataset,
            aggregate: result,
        });
    }

    let mut pivots = Vec::new();
    for def in PIVOT_VIEWS {
        let Some(table) = subset_for(def.dataset) else {
            continue;
        };
        let pivot = monthly_pivot(
            table,
            ctx.date_column(),
            def.category,
            def.value,
            &CategoryUniverse::Observed,
        )
        .with_context(|| format!("Building view '{}'", def.title))?;
        let kind = CategoryKind::for_column(def.category);
        let chart = series::build_chart(def.title, &pivot, kind, def.limit);
        pivots.push(PivotView {
            title: def.title.to_string(),
            dataset: def.dataset,
            kind,
            pivot,
            chart,
        });
    }

    Ok(DashboardReport {
        datasets,
        profiles,
        grouped,
        pivots,
    })
}

/// Renders the report as aligned text tables.
pub fn render_report(report: &DashboardReport) -> String {
    let mut out = String::new();
    for overview in &report.datasets {
        let range = overview
            .range
            .map(|r| format!("{} to {}", r.start(), r.end()))
            .unwrap_or_else(|| "no dates".to_string());
        let _ = writeln!(
            out,
            "{} data: {} of {} row(s), {}",
            overview.dataset, overview.selected_rows, overview.rows, range
        );
    }
    for profile in &report.profiles {
        let _ = writeln!(out, "\n## Sample of {} data", profile.dataset);
        out.push_str(&table::render_table(&profile.headers, &profile.sample));
        let _ = writeln!(out, "\n## Descriptive statistics of {} data", profile.dataset);
        let rows = profile
            .summaries
            .iter()
            .map(ColumnSummary::render_row)
            .collect::<Vec<_>>();
        out.push_str(&table::render_table(&stats::summary_headers(), &rows));
        if let Some(unique) = profile.instant_unique {
            let _ = writeln!(out, "{IDENTITY_COLUMN} is unique: {unique}");
        }
    }
    for view in &report.grouped {
        let _ = writeln!(out, "\n## {}", view.title);
        out.push_str(&table::render_table(
            &view.aggregate.headers(),
            &view.aggregate.to_string_rows(),
        ));
    }
    for view in &report.pivots {
        let _ = writeln!(out, "\n## {}", view.title);
        out.push_str(&table::render_table(
            &series::labelled_headers(&view.pivot, view.kind),
            &view.pivot.to_string_rows(),
        ));
    }
    out
}

pub fn execute(args: &ReportArgs) -> Result<()> {
    let config = crate::load_config(args.config.as_deref())?;
    let kinds = if args.datasets.is_empty() {
        DatasetKind::ALL.to_vec()
    } else {
        args.datasets.clone()
    };
    let options = LoadOptions {
        date_column: config.date_column.clone(),
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
    };
    let ctx = DashboardContext::load(&config, &kinds, &options)
        .context("Loading dashboard datasets")?;
    let report = build_report(&ctx, args.range.start, args.range.end)?;
    let rendered = if args.json {
        serde_json::to_string_pretty(&report).context("Serializing report")? + "\n"
    } else {
        render_report(&report)
    };
    print!("{rendered}");
    info!(
        "Rendered {} grouped view(s) and {} pivot view(s)",
        report.grouped.len(),
        report.pivots.len()
    );
    Ok(())
}
