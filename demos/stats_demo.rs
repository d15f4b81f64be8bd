use clap::Parser;
use probe_hash::HashTable;
use probe_hash::hash::hash_int;
use probe_hash::hash_table::Entry;

#[derive(Parser, Debug)]
struct Args {
    /// Number of entries to insert.
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: u64,

    /// Remove every n-th entry after filling, to show how backward shifting
    /// tightens the clusters. Zero disables removal.
    #[arg(short = 'r', long = "remove_every", default_value_t = 0)]
    remove_every: u64,

    /// Pre-size the table for all entries instead of growing from the
    /// default capacity.
    #[arg(short = 'p', long = "preallocate")]
    preallocate: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut table: HashTable<u64> = if args.preallocate {
        HashTable::with_capacity(args.entries as usize)
    } else {
        HashTable::new()
    };

    println!("Initial capacity: {} slots", table.capacity());
    println!("Filling table with {} u64 values...", args.entries);

    for value in 0..args.entries {
        let hash = hash_int(&value);
        match table.entry(hash, |&v| v == value) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(_) => {
                panic!("Value already exists in table: {}", value);
            }
        }
    }

    println!(
        "Inserted {} values, capacity {} slots",
        table.len(),
        table.capacity()
    );
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    table.probe_histogram().print();
    table.debug_stats().print();

    if args.remove_every > 0 {
        let removed = table.retain(|v| *v % args.remove_every != 0);
        println!();
        println!("Removed {} values", removed);
        table.probe_histogram().print();
        table.debug_stats().print();
    }
}
