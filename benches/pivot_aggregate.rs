use bikeshare_explorer::aggregate::{Statistic, aggregate};
use bikeshare_explorer::data::{ColumnKind, Value};
use bikeshare_explorer::filter::{DateRange, filter_range};
use bikeshare_explorer::pivot::{CategoryUniverse, monthly_pivot};
use bikeshare_explorer::records::RecordTable;
use chrono::{Duration, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};

fn generate_hours(days: i64) -> RecordTable {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).expect("start date");
    let headers = ["dteday", "hr", "season", "weathersit", "workingday", "cnt"]
        .map(String::from)
        .to_vec();
    let kinds = vec![
        ColumnKind::Date,
        ColumnKind::Integer,
        ColumnKind::Integer,
        ColumnKind::Integer,
        ColumnKind::Integer,
        ColumnKind::Integer,
    ];
    let mut rows = Vec::with_capacity((days * 24) as usize);
    for day in 0..days {
        let date = start + Duration::days(day);
        for hr in 0..24i64 {
            let i = day * 24 + hr;
            rows.push(vec![
                Some(Value::Date(date)),
                Some(Value::Integer(hr)),
                Some(Value::Integer((day / 91) % 4 + 1)),
                Some(Value::Integer(i % 4 + 1)),
                Some(Value::Integer(i64::from(day % 7 < 5))),
                Some(Value::Integer((i * 37) % 900)),
            ]);
        }
    }
    RecordTable::new(headers, kinds, rows, "dteday").expect("table")
}

fn bench_views(c: &mut Criterion) {
    let table = generate_hours(731);
    let group = vec!["season".to_string(), "workingday".to_string()];

    c.bench_function("aggregate_all_stats", |b| {
        b.iter(|| aggregate(&table, &group, "cnt", &Statistic::ALL).expect("aggregate"))
    });

    c.bench_function("monthly_pivot_weather", |b| {
        b.iter(|| {
            monthly_pivot(
                &table,
                "dteday",
                "weathersit",
                "cnt",
                &CategoryUniverse::Observed,
            )
            .expect("pivot")
        })
    });

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2011, 6, 1).expect("range start"),
        NaiveDate::from_ymd_opt(2012, 5, 31).expect("range end"),
    )
    .expect("range");
    c.bench_function("filter_then_pivot", |b| {
        b.iter(|| {
            let subset = filter_range(&table, &range);
            monthly_pivot(
                &subset,
                "dteday",
                "workingday",
                "cnt",
                &CategoryUniverse::Observed,
            )
            .expect("pivot")
        })
    });
}

criterion_group!(benches, bench_views);
criterion_main!(benches);
