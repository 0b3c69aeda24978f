mod builder_test;
mod persistence_test;
