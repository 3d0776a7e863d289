use indexed_skiplist::SkipList;

fn main() {
    // Make a new skiplist with at most 4 levels
    let mut sk = SkipList::new(3);
    for i in (0..16u32).rev() {
        // Inserts are O(log(n)) on average
        sk.insert(i);
    }
    // You can print the skiplist, one row per level!
    println!("{:?}", sk);
    // Rank-based access, O(log(n))
    assert_eq!(sk.get_at(4), Some(&4));
    assert_eq!(sk.index_of(&11), Some(11));
    // Rebuild the levels deterministically
    sk.relevel();
    println!("{:?}", sk);
    println!("{}", sk);
}
