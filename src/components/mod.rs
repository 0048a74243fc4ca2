pub mod arch_diagram;
