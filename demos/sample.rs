use skiplist_rs::{SkipList, SkipListConfig};
use tracing_subscriber::EnvFilter;

fn main() -> skiplist_rs::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SkipListConfig::new().max_level_hint(4);
    let mut sl = SkipList::with_config(config)?;

    for key in [5, 1, 9, 3, 7] {
        sl.insert(key);
        println!("insert {key:>2} -> {sl}");
    }

    for key in [7, 4] {
        let found = if sl.search(&key) { "present" } else { "not present" };
        println!("search {key:>2} -> {found}");
    }
    println!("count_occurrence 3 -> {}", sl.count_occurrence(&3));
    println!("lower_bound 4 -> {:?}", sl.lower_bound(&4));
    println!("upper_bound 5 -> {:?}", sl.upper_bound(&5));

    sl.remove(&5);
    println!("remove  5 -> {sl}");
    println!("closest_element 5 -> {:?}", sl.closest_element(&5));

    for lane in (0..=sl.max_level()).rev() {
        let keys: Vec<_> = sl.lane(lane).collect();
        println!("lane {lane}: {keys:?}");
    }

    sl.check_invariants()
}
