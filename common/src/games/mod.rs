pub mod omo;
