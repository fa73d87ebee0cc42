use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tt_core::{AdHeuristic, Background, RecordingHost, RequestDetails, TabId};

const URLS: &[&str] = &[
    "https://www.example.com/",
    "https://cdn.example.com/static/app.3f2a9c.js",
    "https://securepubads.g.doubleclick.net/gampad/ads?iu=/6355419/Travel",
    "https://fonts.gstatic.com/s/roboto/v30/KFOmCnqEu92Fr1Mu4mxK.woff2",
    "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js",
    "https://api.example.com/v1/items?page=2&limit=50",
];

fn bench_is_ad(c: &mut Criterion) {
    let heuristic = AdHeuristic::default();
    c.bench_function("is_ad", |b| {
        b.iter(|| {
            for url in URLS {
                black_box(heuristic.is_ad(black_box(url)));
            }
        })
    });
}

fn bench_on_request(c: &mut Criterion) {
    let requests: Vec<RequestDetails> = URLS
        .iter()
        .enumerate()
        .map(|(i, url)| RequestDetails::new(*url, TabId(i as i32 % 3 + 1)))
        .collect();

    c.bench_function("on_request", |b| {
        let mut bg = Background::default();
        let mut host = RecordingHost::without_receiver();
        b.iter(|| {
            for request in &requests {
                black_box(bg.on_request(&mut host, request));
            }
            host.take_calls();
        })
    });
}

criterion_group!(benches, bench_is_ad, bench_on_request);
criterion_main!(benches);
