pub mod profitability;
