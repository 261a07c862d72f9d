use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use karma_ledger_pipeline::processor::{StoreContent, VotePolicy, VoteProcessor, identity_hash};
use karma_ledger_shared::types::{EventBody, ResolvedEvent, VoteRequest};
use std::collections::HashSet;

/// Creates a resolved message with a long multi-line body.
fn make_event(index: usize) -> ResolvedEvent {
    ResolvedEvent {
        event_id: format!("$message{index}"),
        sender: format!("@author{}:example.org", index % 32),
        body: EventBody::Text(format!(
            "{} number {index}\nsecond line that partial mode drops",
            "a reasonably long first line that will need to be shortened"
        )),
    }
}

fn make_request(index: usize) -> VoteRequest {
    VoteRequest::upvote(
        format!("$message{index}"),
        format!("@voter{}:example.org", index % 64),
        "!room:example.org",
        format!("$vote{index}"),
    )
}

/// Policy with an opt-out list, so every record pays for the hash lookups.
fn make_processor(store_content: StoreContent) -> VoteProcessor {
    VoteProcessor::new(VotePolicy {
        opt_out: (0..100)
            .map(|i| identity_hash(&format!("@shy{i}:example.org")))
            .collect::<HashSet<_>>(),
        store_content,
        ..VotePolicy::default()
    })
}

/// Benchmark screening and building a single vote record
fn single_vote_processing(c: &mut Criterion) {
    let processor = make_processor(StoreContent::Partial);

    c.bench_function("process_single_vote", |b| {
        b.iter_batched(
            || (make_request(1), make_event(1)),
            |(request, event)| {
                let rejected = processor.screen_voter(black_box(&request));
                let record = processor.build_record(black_box(&request), black_box(&event));
                (rejected, record)
            },
            BatchSize::SmallInput,
        )
    });
}

/// Benchmark building records for a batch of votes in each content mode
fn batch_vote_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_vote_batch");
    for (name, mode) in [
        ("off", StoreContent::Off),
        ("partial", StoreContent::Partial),
        ("full", StoreContent::Full),
    ] {
        let processor = make_processor(mode);
        group.bench_function(name, |b| {
            b.iter_batched(
                || {
                    (0..1_000)
                        .map(|i| (make_request(i), make_event(i)))
                        .collect::<Vec<_>>()
                },
                |votes| {
                    votes
                        .iter()
                        .map(|(request, event)| processor.build_record(request, event))
                        .collect::<Vec<_>>()
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, single_vote_processing, batch_vote_processing);
criterion_main!(benches);
