/// Integration tests against real database files
mod csv_transfer;
mod store_workflow;
mod widget_process;
