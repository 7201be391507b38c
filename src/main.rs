extern crate avl_collections;

use avl_collections::AvlTree;
use log::{error, info, LevelFilter};
use simplelog::{Config, SimpleLogger};
use std::env;
use std::process;

fn main() {
    let level = if env::var_os("AVL_TRACE").is_some() {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    if SimpleLogger::init(level, Config::default()).is_err() {
        eprintln!("failed to install logger");
    }

    let mut values = Vec::new();
    for arg in env::args().skip(1) {
        match arg.parse::<i64>() {
            Ok(value) => values.push(value),
            Err(err) => {
                error!("invalid value {:?}: {}", arg, err);
                process::exit(1);
            },
        }
    }
    if values.is_empty() {
        values.extend(1..=7);
    }

    let mut tree = AvlTree::new();
    for value in values {
        tree.insert(value);
    }

    info!("in-order: {}", tree);
    if let Some(root) = tree.root() {
        info!(
            "root: {}, height: {}, balance factor: {}",
            root.value(),
            root.height(),
            root.balance_factor(),
        );
    }
}
