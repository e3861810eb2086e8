use std::sync::Arc;

use capability::Scope;
use common::{CustomerId, Money};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::memory::{InMemoryEventPublisher, InMemoryOrderRepository, RecordingLogger};
use domain::{
    Logger, OrderBundle, OrderFacade, OrderItem, OrderRepository, StandardOrderValidator,
};

fn order_facade() -> OrderFacade {
    OrderFacade::new(OrderBundle::new(
        Arc::new(InMemoryOrderRepository::new()),
        Arc::new(StandardOrderValidator::new()),
        Arc::new(InMemoryEventPublisher::new()),
        Arc::new(RecordingLogger::new()),
    ))
}

fn bench_resolve_through_nested_scopes(c: &mut Criterion) {
    let mut scope =
        Scope::root().with::<dyn OrderRepository>(Arc::new(InMemoryOrderRepository::new()));
    for _ in 0..16 {
        scope = scope.with::<dyn Logger>(Arc::new(RecordingLogger::new()));
    }

    c.bench_function("scope/resolve_outermost_of_17", |b| {
        b.iter(|| scope.resolve::<dyn OrderRepository>().unwrap());
    });
    c.bench_function("scope/resolve_innermost_of_17", |b| {
        b.iter(|| scope.resolve::<dyn Logger>().unwrap());
    });
}

fn bench_facade_scope(c: &mut Criterion) {
    let facade = order_facade();
    let root = Scope::root();

    c.bench_function("facade/install_bundle", |b| {
        b.iter(|| root.with_bundle(facade.bundle()).unwrap());
    });
}

fn bench_place_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let facade = order_facade();

    c.bench_function("facade/place_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                facade
                    .place_order(
                        CustomerId::new(),
                        vec![OrderItem::new("SKU-001", 2, Money::from_cents(1000))],
                    )
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_resolve_through_nested_scopes,
    bench_facade_scope,
    bench_place_order,
);
criterion_main!(benches);
