//! This bench test filters, sorts and summarizes a large synthetic
//! requirement collection, and round-trips it through a data file.

#![allow(missing_docs)]

use std::hint::black_box;

use chrono::{Days, NaiveDate};
use compliance::{
    domain::{
        apply_filters, compute_metrics, sort_records, ActionType, CalendarMonth, Dashboard,
        EquipmentType, Recurrence, SortDirection, YearMonth,
    },
    FilterState, JsonFileRepository, Repository, Requirement, SortKey, Status,
};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;

const COLLECTION_SIZE: usize = 10_000;

/// Generates a collection spread over two years, a third of it completed
fn synthetic_collection() -> Vec<Requirement> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..COLLECTION_SIZE)
        .map(|i| {
            let mut requirement = Requirement::new(
                ActionType::ALL[i % ActionType::ALL.len()],
                Recurrence::CANONICAL[i % Recurrence::CANONICAL.len()].clone(),
                format!("Synthetic obligation {i}"),
                EquipmentType::ALL[i % EquipmentType::ALL.len()],
            );
            let due = start + Days::new(u64::try_from(i % 730).unwrap());
            requirement.needed_by = Some(due.into());
            if i % 3 == 0 {
                requirement.mark_completed(due);
            }
            requirement
        })
        .collect()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

fn derive(c: &mut Criterion) {
    let requirements = synthetic_collection();
    let today = today();

    let mut filters = FilterState::default();
    filters.toggle_status(Status::Pending);
    filters.toggle_status(Status::Overdue);
    filters.set_search("obligation 1");

    c.bench_function("apply filters", |b| {
        b.iter(|| apply_filters(black_box(&requirements), &filters, today));
    });

    let all: Vec<_> = requirements.iter().collect();
    c.bench_function("sort by status", |b| {
        b.iter(|| {
            sort_records(
                black_box(&all),
                SortKey::Status,
                SortDirection::Descending,
                today,
            )
        });
    });

    c.bench_function("compute metrics", |b| {
        b.iter(|| compute_metrics(black_box(&requirements), today));
    });

    c.bench_function("build dashboard", |b| {
        b.iter(|| Dashboard::build(black_box(&requirements), today, 8, 5));
    });

    let month = YearMonth::containing(today);
    c.bench_function("bucket calendar month", |b| {
        b.iter(|| CalendarMonth::build(black_box(&requirements), month));
    });
}

fn round_trip(c: &mut Criterion) {
    let requirements = synthetic_collection();

    c.bench_function("save and load data file", |b| {
        b.iter_batched(
            || TempDir::new().unwrap(),
            |tmp_dir| {
                let repository = JsonFileRepository::new(tmp_dir.path().join("requirements.json"));
                repository.save(&requirements).unwrap();
                repository.load().unwrap()
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, derive, round_trip);
criterion_main!(benches);
