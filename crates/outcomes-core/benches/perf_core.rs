use criterion::{black_box, criterion_group, criterion_main, Criterion};
use outcomes_core::status::{build_cards, Completion};
use outcomes_core::verdict::classify_verdict;
use outcomes_core::{DocumentGroup, FinalVerdict, UploadStatus, UploadStatuses, VerdictData, VerdictStatus};
use serde_json::json;

fn synthetic_case(group_count: usize) -> (Vec<DocumentGroup>, UploadStatuses) {
    let mut groups = Vec::with_capacity(group_count);
    let mut statuses = UploadStatuses::with_capacity(group_count);
    for i in 0..group_count {
        let key = format!("group_{i:04}");
        groups.push(DocumentGroup::new(key.clone(), format!("Group {i}")));
        if i % 7 != 0 {
            statuses.insert(
                key,
                UploadStatus::completed(json!({"data": {"content": {"kpis": {"n": i}}}})),
            );
        }
    }
    (groups, statuses)
}

fn bench_build_cards(c: &mut Criterion) {
    let (groups, statuses) = synthetic_case(500);
    c.bench_function("build_cards_500", |b| {
        b.iter(|| {
            let cards = build_cards(black_box(&groups), black_box(&statuses));
            black_box(Completion::of(&cards))
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    let verdicts: Vec<FinalVerdict> = [
        json!("Approved"),
        json!({"decision": "manual_review", "message": "Needs a second look"}),
        json!("Inconclusive"),
        json!({"status": "pending"}),
    ]
    .into_iter()
    .map(|content| FinalVerdict {
        status: VerdictStatus::Success,
        data: Some(VerdictData::new("case", content)),
        uuid: Some("case".to_string()),
        error: None,
    })
    .collect();

    c.bench_function("classify_verdict_mixed", |b| {
        b.iter(|| {
            for verdict in &verdicts {
                black_box(classify_verdict(true, black_box(verdict)));
            }
        })
    });
}

criterion_group!(benches, bench_build_cards, bench_classify);
criterion_main!(benches);
