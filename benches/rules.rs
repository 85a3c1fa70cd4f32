use criterion::{criterion_group, criterion_main, Criterion};
use esp8266_stub::responder::{Responder, RuleSet};
use esp8266_stub::MockSerialPort;
use std::hint::black_box;
use std::time::Duration;

pub fn bench_rule_lookup(c: &mut Criterion) {
    let rules = RuleSet::esp8266();
    c.bench_function("reply_for_last_rule", |b| {
        b.iter(|| black_box(rules.reply_for(black_box("POST /api/readings HTTP/1.1"))))
    });
    c.bench_function("reply_for_unmatched", |b| {
        b.iter(|| black_box(rules.reply_for(black_box("AT+GMR"))))
    });
}

pub fn bench_session(c: &mut Criterion) {
    let script = "AT+RST\r\nAT+CWMODE=1\r\nAT+CIPMUX=1\r\nAT+CIPSTATUS\r\nAT+CIPSEND=0,42\r\nPOST / HTTP/1.1\r\n";
    c.bench_function("responder_session", |b| {
        b.iter(|| {
            let mut mock = MockSerialPort::new("BENCH");
            mock.enqueue_read(script.as_bytes());
            mock.close();
            let mut responder = Responder::new(mock, RuleSet::esp8266());
            black_box(responder.run().is_err())
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(300))
        .measurement_time(Duration::from_secs(2));
    targets = bench_rule_lookup, bench_session
}
criterion_main!(benches);
