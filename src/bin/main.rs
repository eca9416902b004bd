use avl_bst::{AvlTree, SearchTree};

fn main() {
    let mut tree: AvlTree<u32, char> = AvlTree::new();

    for (key, value) in [(2, 'c'), (0, 'a'), (3, 'd'), (4, 'e'), (5, 'f'), (1, 'b'), (6, 'g')] {
        tree.insert(key, value);
        tree.assert_invariants();
        println!("{:?} (height {})", tree, tree.height());
    }

    let (zero, _) = tree.pop_first().unwrap();
    assert_eq!(zero, 0);
    tree.assert_invariants();

    let mut chain: SearchTree<u32, char> = tree.iter().map(|(&k, &v)| (k, v)).collect();
    println!("chain height {}, balanced: {}", chain.height(), chain.is_balanced());

    tree.as_search_tree().transform(&mut chain).unwrap();
    println!("reshaped height {}, balanced: {}", chain.height(), chain.is_balanced());

    let mut dot = String::new();
    tree.dotgraph("demo", &mut dot).unwrap();
    println!("{dot}");
}
