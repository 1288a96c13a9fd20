mod dtype_device;
mod grad_mode;
