pub mod availability_record;
