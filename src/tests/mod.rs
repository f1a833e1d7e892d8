mod test_individual_link_positions;
mod constraint_test;
