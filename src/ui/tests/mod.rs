
#[cfg(test)]
mod view_tests;
