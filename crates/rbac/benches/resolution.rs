use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use gatekit_rbac::{
    Catalog, Identity, ManagedHierarchyPolicy, Permission, PermissionContext, PermissionResolver,
    ResourcePolicy, Role, can_manage_user,
};

fn mid_admin(managed: usize) -> Identity {
    Identity::human("auth0|bench-admin")
        .with_user_id("bench-admin")
        .with_roles([Role::USER, Role::ADMIN])
        .with_managed_users((0..managed).map(|i| format!("user-{i}")))
}

fn bench_permission_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("permission_resolution");

    for catalog in [Catalog::extended(), Catalog::basic()] {
        let resolver = PermissionResolver::new(catalog);
        let roles = [Role::USER, Role::ADMIN, Role::new("unknown"), Role::USER];

        group.bench_with_input(
            BenchmarkId::new("permissions_for_roles", catalog.version()),
            &roles,
            |b, roles| b.iter(|| resolver.permissions_for_roles(black_box(roles))),
        );
    }

    let resolver = PermissionResolver::default();
    let identity = mid_admin(0);
    group.bench_function("has_permission", |b| {
        b.iter(|| resolver.has_permission(black_box(&identity), black_box(Permission::ListAddresses)))
    });

    group.finish();
}

fn bench_resource_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_evaluation");
    let policy = ManagedHierarchyPolicy::default();
    let resolver = PermissionResolver::default();

    for managed in [10usize, 1_000] {
        let identity = mid_admin(managed);
        let ctx = PermissionContext::new(Permission::UpdateUser).with_resource_id("user-missing");

        group.bench_with_input(BenchmarkId::new("managed_hierarchy_miss", managed), &ctx, |b, ctx| {
            b.iter(|| policy.evaluate(black_box(&identity), black_box(ctx)))
        });

        group.bench_with_input(BenchmarkId::new("can_manage_user_miss", managed), &identity, |b, identity| {
            b.iter(|| can_manage_user(&resolver, black_box(identity), black_box("user-missing")))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_permission_resolution, bench_resource_evaluation);
criterion_main!(benches);
