pub mod emi;
pub mod repayment;
