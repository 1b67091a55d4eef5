pub mod d100_insights;
