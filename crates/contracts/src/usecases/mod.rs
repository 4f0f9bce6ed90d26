pub mod u501_seed_from_sheet;
