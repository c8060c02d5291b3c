//! Benchmarks for the authentication hot path.
//!
//! Run with: cargo bench --bench auth_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eventify_core::auth::{AccessGate, TokenService, TokenSettings};
use eventify_core::rbac::permissions::{CATALOGUE, EVENTS_DELETE, EVENTS_READ};
use eventify_core::rbac::{roles::seed_defaults, MemoryStore, NewUser, PermissionResolver, RbacStore, User, UserStore};
use std::sync::Arc;

fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(TokenSettings::new("bench-secret")).unwrap())
}

fn permission_set(count: usize) -> Vec<&'static str> {
    CATALOGUE.iter().take(count).map(|(name, _)| *name).collect()
}

fn bench_issue_token(c: &mut Criterion) {
    let mut group = c.benchmark_group("issue_token");
    let tokens = token_service();
    let user = User::new("bench@example.com", "", "Bench", "User");

    for count in [0, 3, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &n| {
            let perms = permission_set(n);
            b.iter(|| black_box(tokens.issue_token(&user, perms.iter().copied()).unwrap()));
        });
    }
    group.finish();
}

fn bench_validate_token(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_token");
    let tokens = token_service();
    let user = User::new("bench@example.com", "", "Bench", "User");

    for count in [0, 3, 10] {
        let issued = tokens.issue_token(&user, permission_set(count)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &issued.token, |b, token| {
            b.iter(|| black_box(tokens.validate_token(token).unwrap()));
        });
    }

    group.bench_function("wrong_signature", |b| {
        let foreign = TokenService::new(TokenSettings::new("other-secret")).unwrap();
        let token = foreign.issue_token(&user, [EVENTS_READ]).unwrap().token;
        b.iter(|| black_box(tokens.validate_token(&token).is_err()));
    });
    group.finish();
}

fn bench_gate_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_check");
    let tokens = token_service();
    let gate = AccessGate::new(tokens.clone());
    let user = User::new("bench@example.com", "", "Bench", "User");
    let header = format!("Bearer {}", tokens.issue_token(&user, [EVENTS_READ]).unwrap().token);

    group.bench_function("allow", |b| {
        b.iter(|| black_box(gate.check(Some(header.as_str()), &[EVENTS_READ]).is_ok()));
    });
    group.bench_function("deny", |b| {
        b.iter(|| black_box(gate.check(Some(header.as_str()), &[EVENTS_DELETE]).is_err()));
    });
    group.bench_function("malformed_header", |b| {
        b.iter(|| black_box(gate.check(Some("Token abc"), &[EVENTS_READ]).is_err()));
    });
    group.finish();
}

fn bench_resolve_permissions(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_permissions");
    let rt = tokio::runtime::Runtime::new().unwrap();

    let store = Arc::new(MemoryStore::new());
    let user_id = rt.block_on(async {
        seed_defaults(store.as_ref()).await.unwrap();
        let user = store
            .create_user(NewUser {
                email: "bench@example.com".to_string(),
                password: "password123".to_string(),
                first_name: String::new(),
                last_name: String::new(),
            })
            .await
            .unwrap();
        for role in store.get_all_roles().await.unwrap() {
            store.assign_role_to_user(user.id, role.id).await.unwrap();
        }
        user.id
    });
    let resolver = PermissionResolver::new(store);

    group.throughput(Throughput::Elements(1));
    group.bench_function("all_roles", |b| {
        b.iter(|| rt.block_on(async { black_box(resolver.resolve_permissions(user_id).await.unwrap()) }));
    });
    group.finish();
}

criterion_group!(benches, bench_issue_token, bench_validate_token, bench_gate_check, bench_resolve_permissions);
criterion_main!(benches);
