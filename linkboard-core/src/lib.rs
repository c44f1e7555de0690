pub mod group;
pub mod load;
pub mod report;
pub mod view;

pub use group::{LinkGroups, ParentSummary, group_by_parent};
pub use load::{DEFAULT_ENDPOINT, LoadOptions, load_flat_view, load_grouped_view};
pub use view::{FlatView, GroupedView, MountPoint, ViewState, bind_flat, bind_grouped};

const BANNER: &str = r#"
  _ _       _    _                         _
 | (_)_ __ | | _| |__   ___   __ _ _ __ __| |
 | | | '_ \| |/ / '_ \ / _ \ / _` | '__/ _` |
 | | | | | |   <| |_) | (_) | (_| | | | (_| |
 |_|_|_| |_|_|\_\_.__/ \___/ \__,_|_|  \__,_|
"#;

pub fn print_banner() {
    println!("{}", BANNER);
    println!("  broken link viewer v{}\n", env!("CARGO_PKG_VERSION"));
}
