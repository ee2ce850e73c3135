mod common;

mod games;
mod ko;
mod pass;
