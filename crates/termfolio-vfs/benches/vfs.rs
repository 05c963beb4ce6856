use criterion::{Criterion, black_box, criterion_group, criterion_main};
use termfolio_vfs::{FileNode, initial_file_system, normalize};

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_relative_dotdot", |b| {
        b.iter(|| normalize(black_box("../tugdual/./projects/../ABOUT.txt"), black_box("/home/visitor")))
    });
    c.bench_function("normalize_absolute", |b| {
        b.iter(|| normalize(black_box("/var/www/html/index.html"), black_box("/")))
    });
}

fn bench_listing(c: &mut Criterion) {
    let fs = initial_file_system();
    c.bench_function("list_children_root_hidden", |b| {
        b.iter(|| fs.list_children(black_box("/"), true))
    });
    c.bench_function("descendants_root", |b| {
        b.iter(|| fs.descendants(black_box("/")).count())
    });
}

fn bench_cow(c: &mut Criterion) {
    let fs = initial_file_system();
    let node = FileNode::file("x", "-rw-r--r--", "visitor", "users", "Jan 1 2023");
    c.bench_function("create_then_remove", |b| {
        b.iter(|| {
            let grown = fs.create("/tmp/bench.txt", node.clone()).unwrap();
            grown.remove("/tmp/bench.txt").unwrap()
        })
    });
}

criterion_group!(benches, bench_normalize, bench_listing, bench_cow);
criterion_main!(benches);
