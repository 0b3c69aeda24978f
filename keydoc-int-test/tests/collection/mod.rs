mod batch_operations_test;
mod collection_negative_test;
mod insert_test;
mod remove_test;
mod update_test;
