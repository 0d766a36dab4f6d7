#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use wirebox::{args, Args, Binding, BindingLayer, ClassDescriptor, Classes, Config, Container, ContainerRegistry, Param, Root};

struct A(Arc<B>, Arc<C>);
struct B(i32);
struct C(Arc<CA>);
struct CA(Arc<CAA>);
struct CAA(Arc<CAAA>);
struct CAAA(Arc<CAAAA>);
struct CAAAA(Arc<CAAAAA>);
struct CAAAAA;

#[inline]
fn classes() -> Arc<Classes> {
    Arc::new(
        Classes::new()
            .provide(ClassDescriptor::new("CAAAAA", |_| Ok(CAAAAA)))
            .provide(ClassDescriptor::new("CAAAA", |args| Ok(CAAAA(args.get(0)?))).param(Param::class("caaaaa", "CAAAAA")))
            .provide(ClassDescriptor::new("CAAA", |args| Ok(CAAA(args.get(0)?))).param(Param::class("caaaa", "CAAAA")))
            .provide(ClassDescriptor::new("CAA", |args| Ok(CAA(args.get(0)?))).param(Param::class("caaa", "CAAA")))
            .provide(ClassDescriptor::new("CA", |args| Ok(CA(args.get(0)?))).param(Param::class("caa", "CAA")))
            .provide(ClassDescriptor::new("C", |args| Ok(C(args.get(0)?))).param(Param::class("ca", "CA")))
            .provide(
                ClassDescriptor::new("B", |args| Ok(B(args.cloned(0)?)))
                    .param(Param::builtin("value", "int").with_default(2i32)),
            )
            .provide(
                ClassDescriptor::new("A", |args| Ok(A(args.get(0)?, args.get(1)?)))
                    .param(Param::class("b", "B"))
                    .param(Param::class("c", "C")),
            ),
    )
}

#[inline]
fn container_resolve(container: &Container) {
    let _ = container.resolve("A", Args::new()).unwrap();
}

#[inline]
fn container_resolve_alias(container: &Container) {
    let _ = container.resolve("CAAAAA", Args::new()).unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let classes = classes();
    let transient = Container::new(
        "transient",
        classes.clone(),
        ["A", "B", "C", "CA", "CAA", "CAAA", "CAAAA", "CAAAAA"]
            .into_iter()
            .fold(BindingLayer::new(), |layer, name| {
                layer.bind_with_config(name, Binding::class(name), Config::transient())
            }),
    );
    let cached = Container::new("cached", classes.clone(), BindingLayer::new());
    let aliased = Container::new("aliased", classes, BindingLayer::new().bind("leaf", Binding::class("CAAAAA")));
    let registry = ContainerRegistry::new(Classes::new());

    c.bench_function("container_new", |b| {
        b.iter(|| Container::new("bench", Arc::new(Classes::new()), BindingLayer::new()))
    })
    .bench_function("container_resolve", |b| b.iter(|| container_resolve(&transient)))
    .bench_function("container_resolve_with_cache", |b| b.iter(|| container_resolve(&cached)))
    .bench_function("container_resolve_alias_with_cache", |b| {
        b.iter(|| container_resolve_alias(&aliased))
    })
    .bench_function("container_register", |b| {
        b.iter(|| cached.register("value", Binding::instance(1u8), true))
    })
    .bench_function("registry_init", |b| b.iter(|| registry.init::<Root>(false)))
    .bench_function("registry_resolve_factory_args", |b| {
        let container = registry.get_or_create_named("factory", None);
        container.register_with_config(
            "sum",
            Binding::factory(|_, args| Ok(*args.get::<u32>(0)? + *args.get::<u32>(1)?)),
            Config::transient(),
            true,
        );
        b.iter(|| container.resolve("sum", args![1u32, 2u32]).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
