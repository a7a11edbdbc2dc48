use criterion::{Criterion, criterion_group, criterion_main};
use fixcore::fast::{FastBuilder, FastMessage, FastParser};
use std::hint::black_box;

const NEW_ORDER_SINGLE: &[u8] =
    b"8=FIX.4.2\x019=49\x0135=D\x0155=AAPL\x0154=1\x0138=100\x0144=150.50\x0110=214\x01";

fn parse_benchmark(c: &mut Criterion) {
    let parser = FastParser::new();
    let mut message = FastMessage::with_capacity(128, 16);
    c.bench_function("fast parser: new order single", |b| {
        b.iter(|| {
            parser.parse_into(black_box(NEW_ORDER_SINGLE), &mut message);
            black_box(message.field_count());
        })
    });
}

fn build_benchmark(c: &mut Criterion) {
    c.bench_function("fast builder: new order single", |b| {
        b.iter(|| {
            let mut builder = FastBuilder::with_default_head_room(64);
            builder.set_begin_string(black_box(b"FIX.4.2"));
            builder.set_msg_type(black_box(b"D"));
            builder.append_field(55, b"AAPL");
            builder.append_field(54, b"1");
            builder.append_field(38, b"100");
            builder.append_field(44, b"150.50");
            black_box(builder.finalize().unwrap());
        })
    });
}

criterion_group!(benches, parse_benchmark, build_benchmark);
criterion_main!(benches);
