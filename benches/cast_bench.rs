use criterion::{black_box, criterion_group, criterion_main, Criterion};
use opal::{cast_vector, LogicalType, Value, Vector, VECTOR_CAPACITY};

fn integer_batch() -> Vector {
    let values: Vec<Value> = (0..VECTOR_CAPACITY as i32).map(Value::integer).collect();
    Vector::from_values(LogicalType::Integer, &values).expect("batch construction")
}

fn decimal_batch() -> Vector {
    let values: Vec<Value> = (0..VECTOR_CAPACITY as i128)
        .map(|v| Value::decimal(v * 100, 10, 2))
        .collect();
    Vector::from_values(LogicalType::Decimal { width: 10, scale: 2 }, &values)
        .expect("batch construction")
}

fn string_batch() -> Vector {
    let values: Vec<Value> = (0..VECTOR_CAPACITY)
        .map(|v| Value::varchar(v.to_string()))
        .collect();
    Vector::from_values(LogicalType::Varchar, &values).expect("batch construction")
}

fn bench_integer_widening(c: &mut Criterion) {
    let source = integer_batch();
    c.bench_function("cast_integer_to_bigint", |b| {
        b.iter(|| {
            let mut result = Vector::new(LogicalType::BigInt, VECTOR_CAPACITY);
            cast_vector(black_box(&source), &mut result, VECTOR_CAPACITY, false)
                .expect("widening cast");
            result
        })
    });
}

fn bench_decimal_rescale(c: &mut Criterion) {
    let source = decimal_batch();
    c.bench_function("cast_decimal_rescale", |b| {
        b.iter(|| {
            let mut result =
                Vector::new(LogicalType::Decimal { width: 12, scale: 4 }, VECTOR_CAPACITY);
            cast_vector(black_box(&source), &mut result, VECTOR_CAPACITY, false)
                .expect("rescale cast");
            result
        })
    });
}

fn bench_string_parse(c: &mut Criterion) {
    let source = string_batch();
    c.bench_function("cast_string_to_integer", |b| {
        b.iter(|| {
            let mut result = Vector::new(LogicalType::Integer, VECTOR_CAPACITY);
            cast_vector(black_box(&source), &mut result, VECTOR_CAPACITY, false)
                .expect("parse cast");
            result
        })
    });
}

criterion_group!(
    benches,
    bench_integer_widening,
    bench_decimal_rescale,
    bench_string_parse
);
criterion_main!(benches);
