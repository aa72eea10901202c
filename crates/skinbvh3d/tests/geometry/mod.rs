mod closest_across_objects;
mod deforming_limbs;
mod shot_benchmark;
