use chrono::NaiveDate;

use confere_core::engine::{run, ReportJob, RunContext};
use confere_core::model::{Cell, Table};
use confere_core::sink::NullSink;
use confere_core::{EngineError, ReportKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ctx(today: NaiveDate) -> RunContext<'static> {
    RunContext {
        today,
        log: &NullSink,
        progress: &NullSink,
    }
}

fn contact_table() -> Table {
    Table::with_header(
        vec![
            "Código".into(),
            "Nome".into(),
            "Contato".into(),
            "Grupo".into(),
        ],
        vec![
            vec![
                Cell::Text("123".into()),
                Cell::Text("Acme LLC".into()),
                Cell::Text("J. Doe".into()),
                Cell::Text("Group A".into()),
            ],
            vec![
                Cell::Number(456.0),
                Cell::Text("Initech Inc".into()),
                Cell::Text("P. Gibbons".into()),
                Cell::Text("Group B".into()),
            ],
        ],
    )
}

#[test]
fn cross_match_code_precedes_name_but_padding_defeats_codes() {
    // "00123" does not canonicalize to "123", so the code path misses and
    // the exact-name fallback resolves the row.
    let origin = Table::new(vec![vec![
        Cell::Text("00123".into()),
        Cell::Text("Acme LLC".into()),
    ]]);
    let job = ReportJob::CrossMatch {
        origin,
        contacts: contact_table(),
    };
    let report = run(job, &ctx(date(2024, 1, 7))).unwrap();

    assert_eq!(report.summary.matched_code, 0);
    assert_eq!(report.summary.matched_name, 1);
    assert_eq!(
        report.table.rows[0],
        vec![
            Cell::Text("123".into()),
            Cell::Text("Acme LLC".into()),
            Cell::Text("J. Doe".into()),
            Cell::Text("Group A".into()),
        ]
    );
}

#[test]
fn cross_match_falls_through_to_fuzzy_and_then_gives_up() {
    let origin = Table::new(vec![
        vec![Cell::Text("456".into()), Cell::Empty],
        vec![Cell::Text("Initech Incc".into()), Cell::Empty],
        vec![Cell::Text("Wholly Unrelated SA".into()), Cell::Empty],
    ]);
    let job = ReportJob::CrossMatch {
        origin,
        contacts: contact_table(),
    };
    let report = run(job, &ctx(date(2024, 1, 7))).unwrap();

    assert_eq!(report.summary.matched_code, 1);
    assert_eq!(report.summary.matched_fuzzy, 1);
    assert_eq!(report.summary.unmatched, 1);

    // unmatched rows keep their original values with blank contact fields
    assert_eq!(
        report.table.rows[2],
        vec![
            Cell::Text("Wholly Unrelated SA".into()),
            Cell::Text("Wholly Unrelated SA".into()),
            Cell::Empty,
            Cell::Empty,
        ]
    );
}

#[test]
fn cross_match_is_deterministic_across_runs() {
    let origin = Table::new(vec![
        vec![Cell::Text("123".into())],
        vec![Cell::Text("initech inc".into())],
        vec![Cell::Text("Acme LLLC".into())],
        vec![Cell::Text("nobody".into())],
    ]);
    let run_once = || {
        let job = ReportJob::CrossMatch {
            origin: origin.clone(),
            contacts: contact_table(),
        };
        run(job, &ctx(date(2024, 1, 7))).unwrap()
    };

    let first = run_once();
    let second = run_once();
    assert_eq!(first.table, second.table);
    assert_eq!(first.summary, second.summary);
}

#[test]
fn billing_statement_end_to_end() {
    let text = [
        "Cliente: 42",
        "Nome: Foo Corp",
        "01/01/2024 1.234,56",
    ]
    .join("\n");

    let contacts = Table::new(vec![vec![
        Cell::Text("42".into()),
        Cell::Text("Foo Corp".into()),
        Cell::Text("J. Doe".into()),
        Cell::Text("Group A".into()),
    ]]);

    let job = ReportJob::BillingPdf { text, contacts };
    let report = run(job, &ctx(date(2024, 1, 7))).unwrap();

    assert_eq!(report.kind, ReportKind::Cobranca);
    assert_eq!(report.summary.rows, 1);

    let row = &report.table.rows[0];
    assert_eq!(row[0], Cell::Text("42".into()));
    assert_eq!(row[1], Cell::Text("Foo Corp".into()));
    assert_eq!(row[2], Cell::Text("J. Doe".into()));
    assert_eq!(row[3], Cell::Text("Group A".into()));
    assert_eq!(row[4], Cell::Number(1234.56));
    assert_eq!(row[5], Cell::Text("01/01/2024".into()));
    // six days elapsed: still the first reminder letter
    assert_eq!(row[6], Cell::Number(1.0));
}

#[test]
fn renewal_report_drops_expired_contracts() {
    let base = Table::new(vec![
        vec![
            Cell::Text("123".into()),
            Cell::Text("Ana".into()),
            Cell::Date(date(2024, 1, 1)),
        ],
        vec![
            Cell::Text("456".into()),
            Cell::Text("Bruno".into()),
            Cell::Date(date(2024, 3, 1)),
        ],
    ]);
    let job = ReportJob::ContractRenewal {
        base,
        contacts: contact_table(),
    };
    let report = run(job, &ctx(date(2024, 1, 7))).unwrap();

    assert_eq!(report.summary.rows, 1);
    assert_eq!(
        report.table.rows[0],
        vec![
            Cell::Text("456".into()),
            Cell::Text("P. Gibbons".into()),
            Cell::Text("Group B".into()),
            Cell::Text("Bruno".into()),
            Cell::Text("01/03/2024".into()),
        ]
    );
}

#[test]
fn certificate_report_formats_tax_ids_and_tiers() {
    let base = Table::new(vec![vec![
        Cell::Text("123".into()),
        Cell::Text("Acme LLC".into()),
        Cell::Number(1234567890123.0),
        Cell::Empty,
        Cell::Date(date(2024, 1, 10)),
        Cell::Empty,
        Cell::Empty,
        Cell::Text("Ativo".into()),
    ]]);
    let job = ReportJob::CertificateNotice {
        base,
        contacts: contact_table(),
    };
    let report = run(job, &ctx(date(2024, 1, 7))).unwrap();

    let row = &report.table.rows[0];
    assert_eq!(row[4], Cell::Text("01234567890123".into()));
    assert_eq!(row[5], Cell::Text("10/01/2024".into()));
    // three days remaining: inside the final five-day window
    assert_eq!(row[6], Cell::Number(2.0));
}

#[test]
fn contacts_table_width_is_validated() {
    let narrow = Table::new(vec![vec![
        Cell::Text("123".into()),
        Cell::Text("Acme".into()),
        Cell::Text("J.".into()),
    ]]);
    let job = ReportJob::CrossMatch {
        origin: Table::new(vec![vec![Cell::Text("123".into())]]),
        contacts: narrow,
    };
    let err = run(job, &ctx(date(2024, 1, 7))).unwrap_err();
    assert!(matches!(
        err,
        EngineError::TooFewColumns {
            required: 4,
            found: 3
        }
    ));
}

#[test]
fn task_schedule_never_consults_contacts() {
    let base = Table::new(vec![
        vec![
            Cell::Number(1.0),
            Cell::Text("Acme".into()),
            Cell::Text("entregar".into()),
        ],
        vec![
            Cell::Text("1".into()),
            Cell::Text("Acme".into()),
            Cell::Text("conferir".into()),
        ],
    ]);
    let job = ReportJob::TaskSchedule {
        base,
        period: Some("07/2025".into()),
    };
    let report = run(job, &ctx(date(2025, 8, 5))).unwrap();

    assert_eq!(report.kind, ReportKind::DomBotGms);
    assert_eq!(report.summary.rows, 1);
    assert_eq!(
        report.table.rows[0],
        vec![
            Cell::Text("1".into()),
            Cell::Text("Acme".into()),
            Cell::Text("07/2025".into()),
            Cell::Text("1-Acme-072025".into()),
            Cell::Text("072025".into()),
            Cell::Text(r"Z:\Pessoal\2025\GMS\1-Acme-072025.pdf".into()),
        ]
    );
}
